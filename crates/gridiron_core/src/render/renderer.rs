use super::frame::RenderFrame;

/// Receives every frame the playback controller emits.
///
/// The frame is shared, never handed over for mutation. Drawing, styling and
/// layout belong to the implementor.
pub trait FrameRenderer {
    fn render(&mut self, frame: &RenderFrame);
}

impl<F> FrameRenderer for F
where
    F: FnMut(&RenderFrame),
{
    fn render(&mut self, frame: &RenderFrame) {
        self(frame)
    }
}

/// Keeps every emitted frame, in emission order.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Vec<RenderFrame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RenderFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl FrameRenderer for FrameRecorder {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames.push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameComposer;

    #[test]
    fn test_closures_are_renderers() {
        let mut seen = Vec::new();
        {
            let mut renderer = |frame: &RenderFrame| seen.push(frame.frame_global_id);
            renderer.render(&FrameComposer::default().blank(3, None));
        }
        assert_eq!(seen, [3]);
    }

    #[test]
    fn test_recorder_keeps_order() {
        let composer = FrameComposer::default();
        let mut recorder = FrameRecorder::new();
        recorder.render(&composer.blank(1, None));
        recorder.render(&composer.blank(0, None));
        let ids: Vec<_> = recorder.frames().iter().map(|f| f.frame_global_id).collect();
        assert_eq!(ids, [1, 0]);
        assert_eq!(recorder.last().map(|f| f.frame_global_id), Some(0));
    }
}
