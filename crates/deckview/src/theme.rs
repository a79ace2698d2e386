use eframe::egui::Color32;

/// Chrome colors and text sizes for the viewer windows. Slide styling is the
/// renderer's business; this only covers what deckview draws itself.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub muted: Color32,
    pub panel: Color32,
    pub title_size: f32,
    pub body_size: f32,
    pub notes_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            muted: Color32::from_rgb(0x80, 0x80, 0x80),
            panel: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            title_size: 72.0,
            body_size: 40.0,
            notes_size: 20.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            muted: Color32::from_rgb(0x70, 0x70, 0x78),
            panel: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            title_size: 72.0,
            body_size: 40.0,
            notes_size: 20.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    pub fn toggled(&self) -> Self {
        if self.is_dark() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    /// Text sizes scaled to a slide area of `height` points.
    pub fn scaled(&self, height: f32) -> (f32, f32) {
        let scale = (height / 1080.0).clamp(0.15, 2.0);
        (self.title_size * scale, self.body_size * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_light() {
        assert!(Theme::from_name("dark").is_dark());
        assert!(!Theme::from_name("solarized").is_dark());
    }

    #[test]
    fn test_toggle() {
        assert!(Theme::light().toggled().is_dark());
        assert!(!Theme::dark().toggled().is_dark());
    }

    #[test]
    fn test_scaled_sizes_shrink_with_window() {
        let theme = Theme::dark();
        let (full_title, _) = theme.scaled(1080.0);
        let (small_title, small_body) = theme.scaled(270.0);
        assert_eq!(full_title, theme.title_size);
        assert!(small_title < full_title);
        assert!(small_body > 0.0);
    }
}
