// src/ui/panel.rs
//! The "3D Studio" control panel
//!
//! Edits the model material, light, texture and camera projection in place.
//! Loading files needs the GPU, so those requests are returned as a
//! [`PanelAction`] for the caller to carry out.

use std::path::{Path, PathBuf};

use cgmath::{Deg, Rad};
use imgui::{Condition, SliderFlags, TreeNodeFlags};

use crate::gfx::{
    camera::free_camera::{FreeCamera, ProjectionMode},
    resources::material::Material,
    scene::{object::Model, scene::Scene},
};

/// Shortcut buttons: label and file name inside the asset directory.
pub const BUILTIN_OBJECTS: [(&str, &str); 5] = [
    ("Cube", "cube.obj"),
    ("Large Sphere", "sphere_large.obj"),
    ("Pokeball", "pokeball.obj"),
    ("Suzanne", "suzanne.obj"),
    ("Teddy", "teddy.obj"),
];

/// Requests the panel cannot satisfy on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    LoadObject {
        directory: PathBuf,
        file_name: String,
    },
    LoadTexture(PathBuf),
}

/// Text fields that persist between frames.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub object_directory: PathBuf,
    pub object_path: String,
    pub texture_path: String,
}

impl PanelState {
    pub fn new(object_directory: impl Into<PathBuf>) -> Self {
        Self {
            object_directory: object_directory.into(),
            object_path: String::new(),
            texture_path: String::new(),
        }
    }
}

/// Splits user input into a directory and a file name.
///
/// A bare file name resolves against `default_dir`. Returns `None` for
/// input without a file name.
pub fn split_object_path(input: &str, default_dir: &Path) -> Option<(PathBuf, String)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let path = Path::new(input);
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => default_dir.to_path_buf(),
    };

    Some((directory, file_name))
}

/// Draws the studio window and returns the file request made this frame, if any.
pub fn studio_panel(
    ui: &imgui::Ui,
    state: &mut PanelState,
    camera: &mut FreeCamera,
    scene: &mut Scene,
    model: &mut Model,
) -> Option<PanelAction> {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return None;
    }

    let mut action = None;

    ui.window("3D Studio")
        .size([320.0, 520.0], Condition::FirstUseEver)
        .position([10.0, 10.0], Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            if let Some(request) = object_section(ui, state, model) {
                action = Some(request);
            }
            light_section(ui, scene);
            material_section(ui, &mut model.material);
            if let Some(request) = texture_section(ui, state, model) {
                action = Some(request);
            }
            projection_section(ui, camera);
        });

    action
}

fn object_section(ui: &imgui::Ui, state: &mut PanelState, model: &Model) -> Option<PanelAction> {
    if !ui.collapsing_header("OBJ File", TreeNodeFlags::empty()) {
        return None;
    }

    let mut action = None;

    for (i, (label, file_name)) in BUILTIN_OBJECTS.iter().enumerate() {
        if i % 3 != 0 {
            ui.same_line();
        }
        if ui.button(label) {
            action = Some(PanelAction::LoadObject {
                directory: state.object_directory.clone(),
                file_name: file_name.to_string(),
            });
        }
    }

    ui.text(format!("Current: {}", model.file_name));
    if let Some(previous) = &model.previous {
        ui.text_disabled(format!("Previous: {}", previous));
    }

    let submitted = ui
        .input_text("##obj_path", &mut state.object_path)
        .hint("path/to/file.obj")
        .enter_returns_true(true)
        .build();
    ui.same_line();
    if ui.button("Open##obj") || submitted {
        match split_object_path(&state.object_path, &state.object_directory) {
            Some((directory, file_name)) => {
                action = Some(PanelAction::LoadObject {
                    directory,
                    file_name,
                })
            }
            None => log::warn!("No OBJ file given"),
        }
    }

    action
}

fn light_section(ui: &imgui::Ui, scene: &mut Scene) {
    if !ui.collapsing_header("Light", TreeNodeFlags::empty()) {
        return;
    }

    let lighting = &mut scene.lighting;
    for (axis, value) in ["Light X", "Light Y", "Light Z"]
        .iter()
        .zip(lighting.position.iter_mut())
    {
        ui.input_float(*axis, value)
            .step(0.5)
            .step_fast(1.0)
            .display_format("%.1f")
            .build();
    }

    ui.color_edit3("Light color", &mut lighting.color);
    ui.color_edit3("Ambient color", &mut lighting.ambient);
}

fn material_section(ui: &imgui::Ui, material: &mut Material) {
    if !ui.collapsing_header("Object Material", TreeNodeFlags::empty()) {
        return;
    }

    ui.color_edit3("Ambient", &mut material.ambient);
    ui.color_edit3("Diffuse", &mut material.diffuse);
    ui.color_edit3("Specular", &mut material.specular);
    ui.slider_config("Shininess", Material::MIN_SHININESS, Material::MAX_SHININESS)
        .display_format("%.0f")
        .flags(SliderFlags::ALWAYS_CLAMP)
        .build(&mut material.shininess);
}

fn texture_section(ui: &imgui::Ui, state: &mut PanelState, model: &mut Model) -> Option<PanelAction> {
    if !ui.collapsing_header("Object Texture", TreeNodeFlags::empty()) {
        return None;
    }

    ui.checkbox("Show texture", &mut model.texture.show);
    ui.text(format!("Current: {}", model.texture.file_name));

    let submitted = ui
        .input_text("##texture_path", &mut state.texture_path)
        .hint("path/to/image.jpg")
        .enter_returns_true(true)
        .build();
    ui.same_line();
    if ui.button("Load##texture") || submitted {
        match split_object_path(&state.texture_path, &model.texture.directory) {
            Some((directory, file_name)) => {
                return Some(PanelAction::LoadTexture(directory.join(file_name)));
            }
            None => log::warn!("No texture file given"),
        }
    }

    None
}

fn projection_section(ui: &imgui::Ui, camera: &mut FreeCamera) {
    if !ui.collapsing_header("Projection", TreeNodeFlags::empty()) {
        return;
    }

    let projection = &mut camera.projection;

    let mut mode = projection.mode.index();
    if ui.combo_simple_string("Mode", &mut mode, &ProjectionMode::LABELS) {
        projection.mode = ProjectionMode::from_index(mode);
    }

    match projection.mode {
        ProjectionMode::Perspective => {
            ui.slider_config("Field of view", 20.0, 160.0)
                .display_format("%.0f")
                .flags(SliderFlags::ALWAYS_CLAMP)
                .build(&mut projection.fov);
            ui.slider_config("Far", 1.0, 1000.0)
                .display_format("%.0f")
                .flags(SliderFlags::ALWAYS_CLAMP)
                .build(&mut projection.far);
        }
        ProjectionMode::Oblique => {
            ui.slider_config("Top", 1.0, 100.0)
                .display_format("%.1f")
                .flags(SliderFlags::ALWAYS_CLAMP)
                .build(&mut projection.top);
            ui.slider_config("Far", 1.0, 1000.0)
                .display_format("%.0f")
                .flags(SliderFlags::ALWAYS_CLAMP)
                .build(&mut projection.far);
            ui.slider_config("Oblique scale", 0.0, 1.0)
                .display_format("%.2f")
                .flags(SliderFlags::ALWAYS_CLAMP)
                .build(&mut projection.oblique_scale);

            let mut angle = Deg::from(Rad(projection.oblique_angle)).0;
            if ui
                .slider_config("Oblique angle", 15.0, 75.0)
                .display_format("%.0f deg")
                .flags(SliderFlags::ALWAYS_CLAMP)
                .build(&mut angle)
            {
                projection.oblique_angle = Rad::from(Deg(angle)).0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_file_name_uses_default_directory() {
        let split = split_object_path("teddy.obj", Path::new("assets/objs"));
        assert_eq!(
            split,
            Some((PathBuf::from("assets/objs"), "teddy.obj".to_string()))
        );
    }

    #[test]
    fn test_path_keeps_its_directory() {
        let split = split_object_path("  models/ship.obj ", Path::new("assets/objs"));
        assert_eq!(
            split,
            Some((PathBuf::from("models"), "ship.obj".to_string()))
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(split_object_path("   ", Path::new(".")), None);
        assert_eq!(split_object_path("..", Path::new(".")), None);
    }

    #[test]
    fn test_builtin_objects_include_earth() {
        assert!(BUILTIN_OBJECTS
            .iter()
            .any(|(_, file)| *file == "sphere_large.obj"));
    }
}
