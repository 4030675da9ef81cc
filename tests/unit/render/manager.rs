use super::*;
use crate::render::recording::{RecordingRenderInterface, RenderCall};

fn manager() -> (RenderManager, crate::render::recording::RenderLog) {
    let backend = RecordingRenderInterface::new();
    let log = backend.log();
    let mut m = RenderManager::new(Box::new(backend));
    m.set_viewport(800, 600);
    (m, log)
}

#[test]
fn scissor_enable_is_only_sent_on_transitions() {
    let (mut m, log) = manager();
    let r = Rectanglei::from_position_size(10, 10, 100, 100);

    m.set_scissor_region(Some(r));
    m.set_scissor_region(Some(r));
    m.disable_scissor_region();
    m.disable_scissor_region();

    assert_eq!(
        log.take(),
        vec![
            RenderCall::EnableScissor(true),
            RenderCall::SetScissor(r),
            RenderCall::EnableScissor(false),
        ]
    );
}

#[test]
fn scissor_is_clamped_to_viewport() {
    let (mut m, log) = manager();
    m.set_scissor_region(Some(Rectanglei::from_corners(-50, 500, 900, 700)));
    assert_eq!(
        m.scissor_region(),
        Some(Rectanglei::from_corners(0, 500, 800, 600))
    );
    assert!(log.calls().contains(&RenderCall::SetScissor(
        Rectanglei::from_corners(0, 500, 800, 600)
    )));
}

#[test]
fn layer_stack_tracks_top_and_next() {
    let (mut m, _log) = manager();
    m.begin_render();
    let base = m.top_layer().unwrap();
    assert_eq!(m.next_layer(), None);

    let inner = m.push_layer();
    assert_eq!(m.top_layer(), Some(inner));
    assert_eq!(m.next_layer(), Some(base));

    m.pop_layer();
    assert_eq!(m.top_layer(), Some(base));
    m.end_render().unwrap();
    assert_eq!(m.layer_depth(), 0);
}

#[test]
fn base_layer_cannot_be_popped() {
    let (mut m, log) = manager();
    m.begin_render();
    log.take();
    m.pop_layer();
    assert!(log.is_empty());
    assert_eq!(m.layer_depth(), 1);
}

#[test]
fn unbalanced_layers_are_reported_at_end_render() {
    let (mut m, _log) = manager();
    m.begin_render();
    m.push_layer();
    assert!(m.end_render().is_err());
    assert_eq!(m.layer_depth(), 0);
}

#[test]
fn empty_meshes_and_mismatched_textures_are_not_sent() {
    let (mut m, log) = manager();
    assert_eq!(m.compile_geometry(&Mesh::new()), None);
    assert_eq!(m.generate_texture(&[0; 7], 2, 1), None);
    assert!(log.is_empty());
    assert!(m.generate_texture(&[0; 8], 2, 1).is_some());
}
