//! # Studio
//!
//! The OBJ viewer itself: camera, light, model and control panel, plus the
//! per-frame protocol that keeps the GPU uniforms in sync with them.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::{
    config::StudioConfig,
    gfx::{
        camera::{CameraController, FreeCamera},
        rendering::{frame_sync::FrameSync, render_engine::RenderEngine},
        scene::{
            object::{Model, TextureSelection, EARTH_SPIN, ROTATE_STEP, TRANSLATE_STEP},
            scene::Scene,
        },
    },
    input::{Command, RotateDir, TranslateDir},
    ui::panel::{self, PanelAction, PanelState},
    viewer::{Flow, OverlayFn, Viewer},
};

pub struct Studio {
    pub config: StudioConfig,
    pub camera: FreeCamera,
    pub controller: CameraController,
    pub scene: Scene,
    pub model: Model,
    frame_sync: FrameSync,
    panel: PanelState,
    pending_texture: Option<PathBuf>,
}

impl Studio {
    /// Builds the studio and loads the start-up object.
    ///
    /// A start-up object that fails to load is logged and the studio opens
    /// empty; another file can be picked from the panel.
    pub fn new(config: StudioConfig) -> Self {
        let texture = TextureSelection::new(
            config.texture_directory.clone(),
            config.texture_file.clone(),
            config.show_texture,
        );

        let mut studio = Self {
            camera: FreeCamera::new(config.width, config.height),
            controller: CameraController::new(config.camera_step, config.mouse_sensitivity),
            scene: Scene::new(),
            model: Model::new(config.object_directory.clone(), texture.clone()),
            frame_sync: FrameSync::new(),
            panel: PanelState::new(config.object_directory.clone()),
            pending_texture: Some(texture.path()),
            config,
        };

        let (directory, file_name) = (
            studio.config.object_directory.clone(),
            studio.config.object_file.clone(),
        );
        studio.change_object(&directory, &file_name);
        studio
    }

    /// Switches to another OBJ file, keeping the current one if it fails.
    ///
    /// On success the camera is reset and every uniform is re-sent.
    pub fn change_object(&mut self, directory: &Path, file_name: &str) -> bool {
        match self.model.change_object(directory, file_name) {
            Ok(()) => {
                self.camera.reset();
                self.frame_sync.invalidate();
                true
            }
            Err(error) => {
                log::error!("{}", error);
                if !self.model.file_name.is_empty() {
                    log::info!("Keeping {}", self.model.file_name);
                }
                false
            }
        }
    }

    fn reload_object(&mut self) {
        match self.model.reload() {
            Ok(()) => {
                self.camera.reset();
                self.frame_sync.invalidate();
            }
            Err(error) => log::error!("Reload failed: {}", error),
        }
    }

    fn rotate_object(&mut self, dir: RotateDir) {
        let axis = match dir {
            RotateDir::Up => Vector3::unit_x(),
            RotateDir::Down => -Vector3::unit_x(),
            RotateDir::Left => Vector3::unit_y(),
            RotateDir::Right => -Vector3::unit_y(),
        };
        self.model.rotate(axis, ROTATE_STEP);
    }

    fn translate_object(&mut self, dir: TranslateDir) {
        let offset = match dir {
            TranslateDir::Up => Vector3::new(0.0, TRANSLATE_STEP, 0.0),
            TranslateDir::Down => Vector3::new(0.0, -TRANSLATE_STEP, 0.0),
            TranslateDir::Left => Vector3::new(-TRANSLATE_STEP, 0.0, 0.0),
            TranslateDir::Right => Vector3::new(TRANSLATE_STEP, 0.0, 0.0),
        };
        self.model.translate(offset);
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::LoadObject {
                directory,
                file_name,
            } => {
                self.change_object(&directory, &file_name);
            }
            PanelAction::LoadTexture(path) => self.pending_texture = Some(path),
        }
    }

    fn load_pending_texture(&mut self, engine: &mut RenderEngine) {
        let Some(path) = self.pending_texture.take() else {
            return;
        };

        match engine.load_texture(&path) {
            Ok(()) => self.texture_loaded(&path),
            Err(error) => log::error!("{}", error),
        }
    }

    fn texture_loaded(&mut self, path: &Path) {
        self.model.texture.set_path(path);
        self.model.texture.loaded = true;
    }
}

impl Viewer for Studio {
    fn on_input(&mut self, command: Command) -> Flow {
        match command {
            Command::RotateObject(dir) => self.rotate_object(dir),
            Command::TranslateObject(dir) => self.translate_object(dir),
            Command::Move(motion, active) => self.controller.set_motion(motion, active),
            Command::ReloadObject => self.reload_object(),
            Command::ToggleMouseLook => {
                self.controller.toggle_mouse_look();
            }
            Command::Quit => return Flow::Exit,
        }
        Flow::Continue
    }

    fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.controller.add_mouse_delta(dx, dy);
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    fn release_input(&mut self) {
        self.controller.release_all();
    }

    fn update(&mut self) {
        self.controller.apply(&mut self.camera);

        if self.model.is_spinning_earth() {
            self.model.rotate(Vector3::unit_y(), EARTH_SPIN);
        }
    }

    fn draw_ui(&mut self, ui: &imgui::Ui) {
        let action = panel::studio_panel(
            ui,
            &mut self.panel,
            &mut self.camera,
            &mut self.scene,
            &mut self.model,
        );

        if let Some(action) = action {
            self.handle_panel_action(action);
        }
    }

    fn render(
        &mut self,
        engine: &mut RenderEngine,
        overlay: Box<OverlayFn<'_>>,
    ) -> anyhow::Result<()> {
        self.load_pending_texture(engine);
        self.model.upload(engine.device());

        let updates = self
            .frame_sync
            .collect(&self.camera, &self.scene, &self.model);
        engine.apply(&updates);

        engine.render_frame(&self.model, overlay)?;
        Ok(())
    }

    fn mouse_look_active(&self) -> bool {
        self.controller.is_mouse_look()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::Motion, scene::mesh_loader::tests::CUBE_OBJ, scene::object::tests::fixture_dir,
    };
    use cgmath::{Matrix4, Point3, SquareMatrix};

    fn studio(tag: &str, object_file: &str) -> Studio {
        let dir = fixture_dir(tag, &[("cube.obj", CUBE_OBJ), ("sphere_large.obj", CUBE_OBJ)]);
        Studio::new(StudioConfig {
            object_directory: dir,
            object_file: object_file.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_startup_loads_object() {
        let studio = studio("studio_start", "cube.obj");
        assert_eq!(studio.model.file_name, "cube.obj");
        assert_eq!(studio.model.transform, Matrix4::from_scale(0.5));
    }

    #[test]
    fn test_startup_with_missing_object_is_empty() {
        let studio = studio("studio_missing", "nope.obj");
        assert!(studio.model.file_name.is_empty());
        assert!(studio.model.mesh().is_empty());
    }

    #[test]
    fn test_failed_change_keeps_object_and_camera() {
        let mut studio = studio("studio_fallback", "cube.obj");
        studio.camera.translate(Vector3::new(1.0, 0.0, 0.0));
        let eye = studio.camera.eye;
        let dir = studio.config.object_directory.clone();

        assert!(!studio.change_object(&dir, "missing.obj"));

        assert_eq!(studio.model.file_name, "cube.obj");
        assert_eq!(studio.model.mesh().triangle_count(), 12);
        assert_eq!(studio.camera.eye, eye);
    }

    #[test]
    fn test_successful_change_resets_camera() {
        let mut studio = studio("studio_change", "cube.obj");
        studio.camera.translate(Vector3::new(1.0, 0.0, 0.0));
        let dir = studio.config.object_directory.clone();

        assert!(studio.change_object(&dir, "sphere_large.obj"));

        assert_eq!(studio.camera.eye, Point3::new(0.0, 0.0, 2.0));
        assert_eq!(studio.model.previous.as_deref(), Some("cube.obj"));
    }

    #[test]
    fn test_object_commands_update_transform() {
        let mut studio = studio("studio_commands", "cube.obj");
        studio.model.transform = Matrix4::identity();

        studio.on_input(Command::TranslateObject(TranslateDir::Right));
        assert_eq!(studio.model.transform[3][0], TRANSLATE_STEP);

        studio.on_input(Command::RotateObject(RotateDir::Up));
        studio.on_input(Command::RotateObject(RotateDir::Down));
        let m = studio.model.transform;
        assert!((m[1][1] - 1.0).abs() < 1e-5);
        assert!((m[3][0] - TRANSLATE_STEP).abs() < 1e-5);
    }

    #[test]
    fn test_held_key_flies_camera_during_update() {
        let mut studio = studio("studio_fly", "cube.obj");

        studio.on_input(Command::Move(Motion::Forward, true));
        studio.update();
        studio.update();
        studio.on_input(Command::Move(Motion::Forward, false));
        studio.update();

        assert!((studio.camera.eye.z - 1.9).abs() < 1e-5);
    }

    #[test]
    fn test_mouse_look_toggle() {
        let mut studio = studio("studio_look", "cube.obj");
        assert!(!studio.mouse_look_active());

        studio.on_input(Command::ToggleMouseLook);
        assert!(studio.mouse_look_active());

        studio.on_mouse_motion(100.0, 0.0);
        studio.update();
        assert!((studio.camera.yaw - 280.0).abs() < 1e-4);
    }

    #[test]
    fn test_default_start_shows_no_texture() {
        let studio = studio("studio_default_texture", "sphere_large.obj");
        assert!(!studio.model.texture.show);
        assert!(!studio.model.texture.loaded);
        assert!(!studio.model.is_spinning_earth());
    }

    #[test]
    fn test_earth_does_not_spin_without_loaded_texture() {
        let mut studio = studio("studio_no_earth", "sphere_large.obj");
        studio.model.texture.show = true;
        let before = studio.model.transform;

        studio.update();
        assert_eq!(studio.model.transform, before);
    }

    #[test]
    fn test_earth_spins_only_when_textured() {
        let mut studio = studio("studio_earth", "sphere_large.obj");
        studio.model.texture.show = true;
        studio.texture_loaded(Path::new("textures/erf.jpg"));
        let before = studio.model.transform;

        studio.update();
        assert_ne!(studio.model.transform, before);

        studio.model.texture.show = false;
        let paused = studio.model.transform;
        studio.update();
        assert_eq!(studio.model.transform, paused);
    }

    #[test]
    fn test_panel_texture_request_is_deferred() {
        let mut studio = studio("studio_texture", "cube.obj");
        studio.pending_texture = None;

        studio.handle_panel_action(PanelAction::LoadTexture(PathBuf::from("moon.png")));

        assert_eq!(studio.pending_texture, Some(PathBuf::from("moon.png")));
        assert_eq!(studio.model.texture.file_name, "erf.jpg");
    }

    #[test]
    fn test_quit_exits() {
        let mut studio = studio("studio_quit", "cube.obj");
        assert_eq!(studio.on_input(Command::Quit), Flow::Exit);
        assert_eq!(
            studio.on_input(Command::Move(Motion::Left, true)),
            Flow::Continue
        );
    }
}
