//! Render-settings snapshot and the guard that puts it back.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use playblast_host_core::{ContainerFormat, FileFormat, RenderState, SceneState, VideoCodec};

/// Copy of the render settings a playblast overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub output_path: PathBuf,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub resolution_percentage: u32,
    pub file_format: FileFormat,
    pub video_codec: VideoCodec,
    pub container_format: ContainerFormat,
}

impl RenderSnapshot {
    pub fn take<R: RenderState + ?Sized>(render: &R) -> Self {
        Self {
            output_path: render.output_path(),
            resolution_x: render.resolution_x(),
            resolution_y: render.resolution_y(),
            resolution_percentage: render.resolution_percentage(),
            file_format: render.file_format(),
            video_codec: render.video_codec(),
            container_format: render.container_format(),
        }
    }

    pub fn restore<R: RenderState + ?Sized>(&self, render: &mut R) {
        render.set_output_path(self.output_path.clone());
        render.set_resolution_x(self.resolution_x);
        render.set_resolution_y(self.resolution_y);
        render.set_resolution_percentage(self.resolution_percentage);
        render.set_file_format(self.file_format);
        render.set_video_codec(self.video_codec);
        render.set_container_format(self.container_format);
    }
}

/// Copy of the scene's playback range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSnapshot {
    pub frame_start: u32,
    pub frame_end: u32,
}

impl SceneSnapshot {
    pub fn take<S: SceneState + ?Sized>(scene: &S) -> Self {
        Self {
            frame_start: scene.frame_start(),
            frame_end: scene.frame_end(),
        }
    }

    pub fn restore<S: SceneState + ?Sized>(&self, scene: &mut S) {
        scene.set_frame_range(self.frame_start, self.frame_end);
    }
}

/// Exclusive access to a host whose render settings are restored when the
/// guard is released, whether by [`RestoreGuard::restore`] or by drop.
pub struct RestoreGuard<'h, H>
where
    H: RenderState + SceneState + ?Sized,
{
    host: &'h mut H,
    render: Option<RenderSnapshot>,
    scene: Option<SceneSnapshot>,
}

impl<'h, H> RestoreGuard<'h, H>
where
    H: RenderState + SceneState + ?Sized,
{
    /// Snapshot `host`. With `include_scene` the frame range is restored too.
    pub fn new(host: &'h mut H, include_scene: bool) -> Self {
        let render = Some(RenderSnapshot::take(&*host));
        let scene = include_scene.then(|| SceneSnapshot::take(&*host));
        tracing::debug!(include_scene, "Render settings snapshot taken");
        Self {
            host,
            render,
            scene,
        }
    }

    /// Restore the snapshot and release the host.
    pub fn restore(mut self) {
        self.restore_now();
    }

    fn restore_now(&mut self) {
        if let Some(render) = self.render.take() {
            render.restore(&mut *self.host);
        }
        if let Some(scene) = self.scene.take() {
            scene.restore(&mut *self.host);
        }
        tracing::debug!("Render settings restored");
    }
}

impl<H> Deref for RestoreGuard<'_, H>
where
    H: RenderState + SceneState + ?Sized,
{
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H> DerefMut for RestoreGuard<'_, H>
where
    H: RenderState + SceneState + ?Sized,
{
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H> Drop for RestoreGuard<'_, H>
where
    H: RenderState + SceneState + ?Sized,
{
    fn drop(&mut self) {
        if self.render.is_some() {
            tracing::warn!("Capture did not complete normally, restoring render settings");
            self.restore_now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playblast_host_core::HostState;

    fn mutate(host: &mut HostState) {
        host.set_output_path(PathBuf::from("/tmp/out/shot010.mp4"));
        host.set_resolution_x(640);
        host.set_resolution_y(360);
        host.set_resolution_percentage(50);
        host.set_file_format(FileFormat::Ffmpeg);
        host.set_video_codec(VideoCodec::Mpeg4);
        host.set_container_format(ContainerFormat::Avi);
        host.set_frame_range(10, 20);
    }

    #[test]
    fn test_explicit_restore() {
        let mut host = HostState::default();
        let before = host.clone();

        let mut guard = RestoreGuard::new(&mut host, false);
        mutate(&mut guard);
        guard.restore();

        assert_eq!(host.render, before.render);
        assert_eq!((host.scene.frame_start, host.scene.frame_end), (10, 20));
    }

    #[test]
    fn test_drop_restores() {
        let mut host = HostState::default();
        let before = host.clone();
        {
            let mut guard = RestoreGuard::new(&mut host, true);
            mutate(&mut guard);
        }
        assert_eq!(host, before);
    }

    #[test]
    fn test_restore_after_panic() {
        let mut host = HostState::default();
        let before = host.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = RestoreGuard::new(&mut host, false);
            mutate(&mut guard);
            panic!("viewport went away");
        }));

        assert!(result.is_err());
        assert_eq!(host.render, before.render);
    }
}
