//! # Frame Synchronisation
//!
//! Decides, once per frame, which uniforms have to be written to the GPU.
//!
//! Each uniform channel is a [`Tracked`] value holding the current CPU-side
//! data and a snapshot of what was last uploaded. [`FrameSync::collect`]
//! refreshes every channel from the camera, scene and model and returns one
//! [`UniformUpdate`] per channel whose data differs from its snapshot.
//! No GPU access happens here, so the protocol is fully testable.

use crate::gfx::{
    camera::camera_utils::{Camera, ProjectionUniform, ViewUniform},
    resources::material::ModelUniform,
    scene::{
        object::Model,
        scene::{LightUniform, Lighting, Scene},
    },
};

/// A value paired with the last state that was sent to the GPU.
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    current: T,
    committed: Option<T>,
}

impl<T: Clone + PartialEq> Tracked<T> {
    /// Starts dirty: nothing has been committed yet.
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            committed: None,
        }
    }

    pub fn set(&mut self, value: T) {
        self.current = value;
    }

    pub fn is_dirty(&self) -> bool {
        self.committed.as_ref() != Some(&self.current)
    }

    /// Marks the current value as uploaded and returns it.
    pub fn commit(&mut self) -> T {
        self.committed = Some(self.current.clone());
        self.current.clone()
    }

    /// Forgets the snapshot so the value is sent again.
    pub fn invalidate(&mut self) {
        self.committed = None;
    }

    /// Returns the value if it needs uploading, committing it.
    pub fn take_dirty(&mut self) -> Option<T> {
        self.is_dirty().then(|| self.commit())
    }
}

/// One uniform write the renderer has to perform this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformUpdate {
    Projection(ProjectionUniform),
    View(ViewUniform),
    Lighting(LightUniform),
    Model(ModelUniform),
}

pub struct FrameSync {
    projection: Tracked<ProjectionUniform>,
    view: Tracked<ViewUniform>,
    lighting: Tracked<LightUniform>,
    model: Tracked<ModelUniform>,
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSync {
    pub fn new() -> Self {
        Self {
            projection: Tracked::new(ProjectionUniform::default()),
            view: Tracked::new(ViewUniform::default()),
            lighting: Tracked::new(LightUniform::from(&Lighting::default())),
            model: Tracked::new(bytemuck::Zeroable::zeroed()),
        }
    }

    /// Forces every channel to be sent on the next [`FrameSync::collect`].
    pub fn invalidate(&mut self) {
        self.projection.invalidate();
        self.view.invalidate();
        self.lighting.invalidate();
        self.model.invalidate();
    }

    /// Refreshes all channels and returns the updates for the dirty ones.
    pub fn collect(
        &mut self,
        camera: &impl Camera,
        scene: &Scene,
        model: &Model,
    ) -> Vec<UniformUpdate> {
        self.projection.set(camera.projection_uniform());
        self.view.set(camera.view_uniform());
        self.lighting.set(scene.light_uniform());
        self.model.set(model.uniform());

        let mut updates = Vec::with_capacity(4);
        if let Some(proj) = self.projection.take_dirty() {
            updates.push(UniformUpdate::Projection(proj));
        }
        if let Some(view) = self.view.take_dirty() {
            updates.push(UniformUpdate::View(view));
        }
        if let Some(light) = self.lighting.take_dirty() {
            updates.push(UniformUpdate::Lighting(light));
        }
        if let Some(model) = self.model.take_dirty() {
            updates.push(UniformUpdate::Model(model));
        }

        if !updates.is_empty() {
            log::trace!("Frame uniform updates: {}", updates.len());
        }

        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::FreeCamera,
        scene::object::TextureSelection,
    };
    use cgmath::Vector3;

    fn setup() -> (FreeCamera, Scene, Model) {
        let texture = TextureSelection::new(".", "erf.jpg", false);
        (FreeCamera::new(900, 900), Scene::new(), Model::new(".", texture))
    }

    fn count(updates: &[UniformUpdate], pred: fn(&UniformUpdate) -> bool) -> usize {
        updates.iter().filter(|u| pred(u)).count()
    }

    #[test]
    fn test_tracked_protocol() {
        let mut value = Tracked::new(1);
        assert!(value.is_dirty());
        assert_eq!(value.commit(), 1);
        assert!(!value.is_dirty());

        value.set(1);
        assert!(!value.is_dirty());
        value.set(2);
        assert!(value.is_dirty());
        assert_eq!(value.take_dirty(), Some(2));
        assert_eq!(value.take_dirty(), None);

        value.invalidate();
        assert!(value.is_dirty());
    }

    #[test]
    fn test_first_frame_sends_everything() {
        let (camera, scene, model) = setup();
        let mut sync = FrameSync::new();

        let updates = sync.collect(&camera, &scene, &model);
        assert_eq!(updates.len(), 4);
    }

    #[test]
    fn test_unchanged_frame_sends_nothing() {
        let (camera, scene, model) = setup();
        let mut sync = FrameSync::new();

        sync.collect(&camera, &scene, &model);
        assert!(sync.collect(&camera, &scene, &model).is_empty());
    }

    #[test]
    fn test_material_change_sends_model_once() {
        let (camera, scene, mut model) = setup();
        let mut sync = FrameSync::new();
        sync.collect(&camera, &scene, &model);

        model.material.shininess = 20.0;
        let updates = sync.collect(&camera, &scene, &model);

        assert_eq!(updates.len(), 1);
        assert_eq!(count(&updates, |u| matches!(u, UniformUpdate::Model(_))), 1);
        assert!(sync.collect(&camera, &scene, &model).is_empty());
    }

    #[test]
    fn test_camera_move_sends_view_only() {
        let (mut camera, scene, model) = setup();
        let mut sync = FrameSync::new();
        sync.collect(&camera, &scene, &model);

        camera.translate(Vector3::new(0.0, 0.5, 0.0));
        let updates = sync.collect(&camera, &scene, &model);

        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], UniformUpdate::View(_)));
    }

    #[test]
    fn test_projection_and_light_changes() {
        let (mut camera, mut scene, model) = setup();
        let mut sync = FrameSync::new();
        sync.collect(&camera, &scene, &model);

        camera.resize(1800, 900);
        scene.lighting.color = [1.0, 0.0, 0.0];
        let updates = sync.collect(&camera, &scene, &model);

        assert_eq!(updates.len(), 2);
        assert_eq!(count(&updates, |u| matches!(u, UniformUpdate::Projection(_))), 1);
        assert_eq!(count(&updates, |u| matches!(u, UniformUpdate::Lighting(_))), 1);
    }

    #[test]
    fn test_invalidate_resends_all() {
        let (camera, scene, model) = setup();
        let mut sync = FrameSync::new();
        sync.collect(&camera, &scene, &model);

        sync.invalidate();
        assert_eq!(sync.collect(&camera, &scene, &model).len(), 4);
    }
}
