use colored::Colorize;

const BANNER: &str = r"
     _           _          _
  __| | ___  ___| | __ __ _(_) _____      __
 / _` |/ _ \/ __| |/ / \ V / |/ _ \ \ /\ / /
| (_| |  __/ (__|   <   \_/| |  __/\ V  V /
 \__,_|\___|\___|_|\_\     |_|\___| \_/\_/
";

pub fn print_banner_with_version() {
    println!("{}", BANNER.cyan().bold());
    println!(
        "  {} {}",
        "deckview".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).green()
    );
    println!("  {}", env!("CARGO_PKG_DESCRIPTION").dimmed());
    println!();
}
