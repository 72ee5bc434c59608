//! Start-up configuration and the command line that fills it.

use std::path::PathBuf;

use clap::Parser;

use crate::gfx::camera::free_camera::DEFAULT_STEP;

/// Everything the studio needs to know before the window opens.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub object_directory: PathBuf,
    pub object_file: String,
    pub texture_directory: PathBuf,
    pub texture_file: String,
    pub show_texture: bool,
    /// WGSL file to use instead of the built-in shader.
    pub shader_path: Option<PathBuf>,
    /// Window position the cursor is held at during mouse look.
    pub cursor_anchor: (f64, f64),
    pub mouse_sensitivity: f32,
    pub camera_step: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "3D Studio".to_string(),
            width: 900,
            height: 900,
            object_directory: PathBuf::from("assets/objs"),
            object_file: "sphere_large.obj".to_string(),
            texture_directory: PathBuf::from("assets/textures"),
            texture_file: "erf.jpg".to_string(),
            show_texture: false,
            shader_path: None,
            cursor_anchor: (450.0, 450.0),
            mouse_sensitivity: 10.0,
            camera_step: DEFAULT_STEP,
        }
    }
}

/// OBJ viewer with Phong lighting, textures and a free-flying camera
#[derive(Parser, Debug)]
#[command(name = "obj-studio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the OBJ files
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// OBJ file shown at start-up
    #[arg(short, long)]
    pub object: Option<String>,

    /// Texture image (path or file name inside the texture directory)
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// Start with the texture shown
    #[arg(short, long)]
    pub show_texture: bool,

    /// WGSL shader replacing the built-in one
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Applies the given flags on top of [`StudioConfig::default`].
    pub fn into_config(self) -> StudioConfig {
        let mut config = StudioConfig::default();

        if let Some(assets) = self.assets {
            config.object_directory = assets;
        }
        if let Some(object) = self.object {
            config.object_file = object;
        }
        if let Some(texture) = self.texture {
            if let Some(parent) = texture.parent().filter(|p| !p.as_os_str().is_empty()) {
                config.texture_directory = parent.to_path_buf();
            }
            if let Some(name) = texture.file_name() {
                config.texture_file = name.to_string_lossy().into_owned();
            }
        }
        config.show_texture = self.show_texture;
        config.shader_path = self.shader;

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        // Keep the cursor anchor in the middle of the window.
        config.cursor_anchor = (config.width as f64 / 2.0, config.height as f64 / 2.0);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_gives_defaults() {
        let config = Cli::parse_from(["obj-studio"]).into_config();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Cli::parse_from([
            "obj-studio",
            "--assets",
            "models",
            "--object",
            "teddy.obj",
            "--texture",
            "img/wood.png",
            "--show-texture",
            "--width",
            "1200",
            "--height",
            "800",
        ])
        .into_config();

        assert_eq!(config.object_directory, PathBuf::from("models"));
        assert_eq!(config.object_file, "teddy.obj");
        assert_eq!(config.texture_directory, PathBuf::from("img"));
        assert_eq!(config.texture_file, "wood.png");
        assert!(config.show_texture);
        assert_eq!((config.width, config.height), (1200, 800));
        assert_eq!(config.cursor_anchor, (600.0, 400.0));
    }

    #[test]
    fn test_bare_texture_name_keeps_directory() {
        let config = Cli::parse_from(["obj-studio", "-t", "moon.jpg"]).into_config();
        assert_eq!(config.texture_directory, PathBuf::from("assets/textures"));
        assert_eq!(config.texture_file, "moon.jpg");
        assert!(!config.show_texture);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert!(Cli::try_parse_from(["obj-studio", "--width", "0"]).is_err());
    }
}
