use std::path::PathBuf;

use image::Rgba;

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub student_data: PathBuf,
    pub certificate_folder: PathBuf,
    pub default_template: PathBuf,
    pub aiml_template: PathBuf,
    pub dsa_template: PathBuf,
    pub page_templates: PathBuf,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub text_color: Rgba<u8>,
    pub max_content_length: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let path = |key: &str, default: &str| {
            base_dir.join(std::env::var(key).unwrap_or_else(|_| default.to_string()))
        };

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|e| format!("PORT is not a valid port: {e}"))?;

        let font_size: f32 = std::env::var("FONT_SIZE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|e| format!("FONT_SIZE is not a number: {e}"))?;
        if font_size.is_nan() || font_size <= 0.0 {
            return Err("FONT_SIZE must be positive".into());
        }

        let text_color = std::env::var("TEXT_COLOR").unwrap_or_else(|_| "black".to_string());
        let text_color = parse_color(&text_color)
            .ok_or_else(|| format!("TEXT_COLOR is not a known color: {text_color}"))?;

        let max_content_length: usize = std::env::var("MAX_CONTENT_LENGTH")
            .unwrap_or_else(|_| (16 * 1024 * 1024).to_string())
            .parse()
            .map_err(|e| format!("MAX_CONTENT_LENGTH is not a byte count: {e}"))?;

        Ok(Self {
            host,
            port,
            student_data: path("STUDENT_DATA", "student_data.csv"),
            certificate_folder: path("CERTIFICATE_FOLDER", "certificates"),
            default_template: path("TEMPLATE_PATH", "static/certificate_template.png"),
            aiml_template: path("AIML_TEMPLATE_PATH", "templates/aiml_template.png"),
            dsa_template: path("DSA_TEMPLATE_PATH", "templates/dsa_template.png"),
            page_templates: path("PAGE_TEMPLATES", "templates"),
            font_path: path("FONT_PATH", "static/Adamiya.ttf"),
            font_size,
            text_color,
            max_content_length,
        })
    }
}

/// Accepts a handful of color names or `#rrggbb`.
pub fn parse_color(s: &str) -> Option<Rgba<u8>> {
    let s = s.trim();
    let named = match s.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        "navy" => Some([0, 0, 128]),
        "gold" => Some([255, 215, 0]),
        "gray" | "grey" => Some([128, 128, 128]),
        _ => None,
    };
    if let Some([r, g, b]) = named {
        return Some(Rgba([r, g, b, 255]));
    }

    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(parse_color("black"), Some(Rgba([0, 0, 0, 255])));
        assert_eq!(parse_color(" Navy "), Some(Rgba([0, 0, 128, 255])));
        assert_eq!(parse_color("#1a2B3c"), Some(Rgba([0x1a, 0x2b, 0x3c, 255])));
    }

    #[test]
    fn rejects_unknown_colors() {
        assert_eq!(parse_color("chartreuse-ish"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("123456"), None);
    }
}
