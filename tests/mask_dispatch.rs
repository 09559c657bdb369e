/// Dispatch tests for `MaskManager`: which technique each mask is routed to and which
/// commands reach the collaborators.
use std::rc::Rc;

use grafo_mask::{
    MaskData, MaskManager, MaskTechnique, RenderTargetId, RendererSystem, ScissorOrigin,
    ScissorRect, StencilStack,
};
use grafo_mask_test_scenes::{
    check_commands, rect_mask, rotated_rect_mask, sprite_mask, triangle_mask, RecordedCommand,
    RecordingBackend, TestDrawable, TARGET_HEIGHT, TARGET_WIDTH,
};

fn backend() -> RecordingBackend {
    RecordingBackend::new(1, (TARGET_WIDTH, TARGET_HEIGHT))
}

fn push(
    manager: &mut MaskManager,
    backend: &mut RecordingBackend,
    mask: &mut MaskData,
) -> MaskTechnique {
    let mut drawable = TestDrawable::default();
    manager
        .push_mask(&mut backend.context(), &mut drawable, mask)
        .expect("push_mask failed")
}

fn pop(manager: &mut MaskManager, backend: &mut RecordingBackend, mask: &MaskData) -> MaskTechnique {
    manager
        .pop_mask(&mut backend.context(), mask)
        .expect("pop_mask failed")
}

fn assert_commands(actual: &[RecordedCommand], expected: &[RecordedCommand]) {
    let failures = check_commands(actual, expected);
    if !failures.is_empty() {
        panic!(
            "{} command expectation(s) failed:\n{}",
            failures.len(),
            failures.join("\n"),
        );
    }
}

#[test]
fn scissor_rect_is_flipped_for_bottom_left_contexts() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut mask = rect_mask(10.0, 20.0, 100.0, 50.0);

    assert_eq!(push(&mut manager, &mut backend, &mut mask), MaskTechnique::Scissor);
    assert_commands(
        &backend.take_commands(),
        &[RecordedCommand::ScissorEnable(ScissorRect::new(10, 530, 100, 50))],
    );
    assert!(manager.scissor_active(backend.target_id()));
    assert_eq!(
        manager.current_scissor(backend.target_id()),
        Some(ScissorRect::new(10, 20, 100, 50))
    );

    assert_eq!(pop(&mut manager, &mut backend, &mask), MaskTechnique::Scissor);
    assert_commands(&backend.take_commands(), &[RecordedCommand::ScissorDisable]);
    assert!(!manager.scissor_active(backend.target_id()));
    assert_eq!(backend.graphics.scissor, None);
}

#[test]
fn top_left_contexts_receive_unflipped_rect() {
    let mut manager = MaskManager::new();
    let mut backend = backend().with_origin(ScissorOrigin::TopLeft);
    let mut mask = rect_mask(10.0, 20.0, 100.0, 50.0);

    push(&mut manager, &mut backend, &mut mask);
    assert_eq!(backend.graphics.scissor, Some(ScissorRect::new(10, 20, 100, 50)));
    pop(&mut manager, &mut backend, &mask);
}

#[test]
fn scissor_rect_is_scaled_to_physical_pixels() {
    let mut manager = MaskManager::new();
    let mut backend = RecordingBackend::new(1, (1600, 1200)).with_scale_factor(2.0);
    let mut mask = rect_mask(10.0, 20.0, 100.0, 50.0);

    push(&mut manager, &mut backend, &mut mask);
    assert_eq!(backend.graphics.scissor, Some(ScissorRect::new(20, 1060, 200, 100)));
    pop(&mut manager, &mut backend, &mask);
}

#[test]
fn rect_rotation_is_quantized_before_choosing_scissor() {
    let cases = [
        (0.0, MaskTechnique::Scissor),
        (90.0, MaskTechnique::Scissor),
        (180.0, MaskTechnique::Scissor),
        (45.0, MaskTechnique::Stencil),
        (30.0, MaskTechnique::Stencil),
    ];

    for (degrees, expected) in cases {
        let mut manager = MaskManager::new();
        let mut backend = backend();
        let mut mask = rotated_rect_mask(300.0, 200.0, 100.0, 50.0, degrees);

        assert_eq!(
            push(&mut manager, &mut backend, &mut mask),
            expected,
            "push at {degrees} degrees"
        );
        assert_eq!(
            pop(&mut manager, &mut backend, &mask),
            expected,
            "pop at {degrees} degrees"
        );
        assert_eq!(backend.stencil.depth(), 0);
        assert!(!manager.scissor_active(backend.target_id()));
    }
}

#[test]
fn stencil_changes_flush_the_batch_first() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut mask = triangle_mask(10.0, 10.0, 40.0);

    assert_eq!(push(&mut manager, &mut backend, &mut mask), MaskTechnique::Stencil);
    assert_commands(
        &backend.take_commands(),
        &[
            RecordedCommand::BatchStop,
            RecordedCommand::StencilPush { depth: 1 },
        ],
    );

    assert_eq!(pop(&mut manager, &mut backend, &mask), MaskTechnique::Stencil);
    assert_commands(
        &backend.take_commands(),
        &[
            RecordedCommand::BatchStop,
            RecordedCommand::StencilPop { depth: 0 },
        ],
    );
    assert_eq!(backend.batch.stops, 2);
}

#[test]
fn active_stencil_routes_axis_aligned_rects_to_stencil() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut triangle = triangle_mask(10.0, 10.0, 40.0);
    let mut rect = rect_mask(0.0, 0.0, 20.0, 20.0);

    push(&mut manager, &mut backend, &mut triangle);
    assert_eq!(push(&mut manager, &mut backend, &mut rect), MaskTechnique::Stencil);
    assert!(!manager.scissor_active(backend.target_id()));
    assert_eq!(backend.stencil.depth(), 2);

    assert_eq!(pop(&mut manager, &mut backend, &rect), MaskTechnique::Stencil);
    assert_eq!(pop(&mut manager, &mut backend, &triangle), MaskTechnique::Stencil);
    assert_eq!(backend.stencil.depth(), 0);
}

#[test]
fn disabled_scissor_mode_routes_rects_to_stencil() {
    let mut manager = MaskManager::new();
    manager.set_scissor_enabled(false);
    assert!(!manager.scissor_enabled());

    let mut backend = backend();
    let mut mask = rect_mask(10.0, 20.0, 100.0, 50.0);

    assert_eq!(push(&mut manager, &mut backend, &mut mask), MaskTechnique::Stencil);
    assert_eq!(pop(&mut manager, &mut backend, &mask), MaskTechnique::Stencil);
}

#[test]
fn textures_always_use_the_sprite_mask_filter() {
    let mut manager = MaskManager::new();
    manager.set_scissor_enabled(false);
    let mut backend = backend();

    let mut triangle = triangle_mask(10.0, 10.0, 40.0);
    push(&mut manager, &mut backend, &mut triangle);
    backend.take_commands();

    let mut sprite = sprite_mask(42, 30.0, 40.0, (64, 32));
    let mut drawable = TestDrawable::default();
    let technique = manager
        .push_mask(&mut backend.context(), &mut drawable, &mut sprite)
        .unwrap();

    assert_eq!(technique, MaskTechnique::Sprite);
    assert_commands(
        &backend.take_commands(),
        &[RecordedCommand::FilterPush {
            texture: grafo_mask::TextureId(42),
            filter_count: 1,
        }],
    );
    let MaskData::Sprite(sprite_data) = &sprite else {
        unreachable!()
    };
    assert_eq!(drawable.filter_area, Some(sprite_data.bounds));
    assert_eq!(manager.alpha_mask_depth(), 1);

    assert_eq!(pop(&mut manager, &mut backend, &sprite), MaskTechnique::Sprite);
    assert_commands(&backend.take_commands(), &[RecordedCommand::FilterPop]);
    assert_eq!(manager.alpha_mask_depth(), 0);

    pop(&mut manager, &mut backend, &triangle);
}

#[test]
fn pop_uses_stencil_whenever_the_stencil_stack_is_occupied() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut rect = rect_mask(10.0, 20.0, 100.0, 50.0);

    assert_eq!(push(&mut manager, &mut backend, &mut rect), MaskTechnique::Scissor);

    // A peer pushes a stencil mask on the same target.
    let MaskData::Shape(shape) = triangle_mask(0.0, 0.0, 10.0) else {
        unreachable!()
    };
    backend.stencil.push_stencil(&shape);

    assert_eq!(pop(&mut manager, &mut backend, &rect), MaskTechnique::Stencil);
    assert_eq!(backend.stencil.depth(), 0);
    assert!(manager.scissor_active(backend.target_id()));

    assert_eq!(pop(&mut manager, &mut backend, &rect), MaskTechnique::Scissor);
    assert!(!manager.scissor_active(backend.target_id()));
}

#[test]
fn nested_scissors_intersect_and_restore() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut panel = rect_mask(0.0, 0.0, 400.0, 300.0);
    let mut inner = rect_mask(100.0, 100.0, 400.0, 150.0);

    push(&mut manager, &mut backend, &mut panel);
    push(&mut manager, &mut backend, &mut inner);
    assert_eq!(manager.scissor_depth(backend.target_id()), 2);
    assert_eq!(
        manager.current_scissor(backend.target_id()),
        Some(ScissorRect::new(100, 100, 300, 150))
    );

    pop(&mut manager, &mut backend, &inner);
    pop(&mut manager, &mut backend, &panel);

    assert_commands(
        &backend.take_commands(),
        &[
            RecordedCommand::ScissorEnable(ScissorRect::new(0, 300, 400, 300)),
            RecordedCommand::ScissorEnable(ScissorRect::new(100, 350, 300, 150)),
            RecordedCommand::ScissorEnable(ScissorRect::new(0, 300, 400, 300)),
            RecordedCommand::ScissorDisable,
        ],
    );
    assert_eq!(manager.scissor_depth(backend.target_id()), 0);
}

#[test]
fn scissor_push_restores_the_renderable_flag() {
    for initially_renderable in [false, true] {
        let mut manager = MaskManager::new();
        let mut backend = backend();
        let mut mask = rect_mask(10.0, 20.0, 100.0, 50.0);
        if let MaskData::Shape(shape) = &mut mask {
            shape.renderable = initially_renderable;
        }

        assert_eq!(push(&mut manager, &mut backend, &mut mask), MaskTechnique::Scissor);

        let MaskData::Shape(shape) = &mask else {
            unreachable!()
        };
        assert_eq!(shape.renderable, initially_renderable);
        pop(&mut manager, &mut backend, &mask);
    }
}

#[test]
fn sprite_filters_are_reused_per_depth_across_frames() {
    let mut manager = MaskManager::new();
    let mut backend = backend();

    let mut first_frame = sprite_mask(1, 0.0, 0.0, (32, 32));
    push(&mut manager, &mut backend, &mut first_frame);
    pop(&mut manager, &mut backend, &first_frame);
    let slot = manager.alpha_mask_pool_entry(0).unwrap();

    let mut second_frame = sprite_mask(2, 10.0, 10.0, (16, 16));
    push(&mut manager, &mut backend, &mut second_frame);
    assert!(Rc::ptr_eq(&slot, &manager.alpha_mask_pool_entry(0).unwrap()));
    assert_eq!(slot.borrow().mask().texture, grafo_mask::TextureId(2));
    pop(&mut manager, &mut backend, &second_frame);
    assert_eq!(manager.alpha_mask_pool_len(), 1);

    let mut outer = sprite_mask(3, 0.0, 0.0, (32, 32));
    let mut inner = sprite_mask(4, 0.0, 0.0, (8, 8));
    push(&mut manager, &mut backend, &mut outer);
    push(&mut manager, &mut backend, &mut inner);
    assert_eq!(manager.alpha_mask_pool_len(), 2);
    assert_eq!(manager.alpha_mask_depth(), 2);
    pop(&mut manager, &mut backend, &inner);
    pop(&mut manager, &mut backend, &outer);

    assert!(Rc::ptr_eq(&slot, &manager.alpha_mask_pool_entry(0).unwrap()));
    assert!(Rc::ptr_eq(&backend.filters.history[0], &backend.filters.history[1]));
    assert!(!Rc::ptr_eq(&backend.filters.history[2], &backend.filters.history[3]));
    assert_eq!(manager.alpha_mask_depth(), 0);
}

#[test]
fn balanced_sequences_restore_every_stack() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut masks = vec![
        rect_mask(0.0, 0.0, 500.0, 500.0),
        sprite_mask(1, 0.0, 0.0, (64, 64)),
        rect_mask(50.0, 50.0, 100.0, 100.0),
        triangle_mask(60.0, 60.0, 20.0),
        rotated_rect_mask(70.0, 70.0, 10.0, 10.0, 45.0),
        sprite_mask(2, 0.0, 0.0, (64, 64)),
    ];

    for mask in masks.iter_mut() {
        push(&mut manager, &mut backend, mask);
    }
    assert_eq!(manager.alpha_mask_depth(), 2);
    assert_eq!(manager.scissor_depth(backend.target_id()), 2);
    assert_eq!(backend.stencil.depth(), 2);

    for mask in masks.iter().rev() {
        pop(&mut manager, &mut backend, mask);
    }
    assert_eq!(manager.alpha_mask_depth(), 0);
    assert!(!manager.scissor_active(backend.target_id()));
    assert_eq!(backend.stencil.depth(), 0);
    assert!(backend.filters.stack.is_empty());
    assert_eq!(backend.graphics.scissor, None);
}

#[test]
fn scissor_state_is_tracked_per_render_target() {
    let mut manager = MaskManager::new();
    let mut first = RecordingBackend::new(1, (TARGET_WIDTH, TARGET_HEIGHT));
    let mut second = RecordingBackend::new(2, (TARGET_WIDTH, TARGET_HEIGHT));
    let mut mask = rect_mask(10.0, 20.0, 100.0, 50.0);

    push(&mut manager, &mut first, &mut mask);
    assert!(manager.scissor_active(first.target_id()));
    assert!(!manager.scissor_active(second.target_id()));

    let mut other = rect_mask(0.0, 0.0, 30.0, 30.0);
    push(&mut manager, &mut second, &mut other);
    assert_eq!(second.graphics.scissor, Some(ScissorRect::new(0, 570, 30, 30)));

    pop(&mut manager, &mut second, &other);
    assert!(manager.scissor_active(first.target_id()));
    assert_eq!(manager.scissored_target_count(), 1);
    pop(&mut manager, &mut first, &mask);
    assert_eq!(manager.scissored_target_count(), 0);
}

#[test]
fn transient_targets_leave_no_scissor_state_behind() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut outer = rect_mask(10.0, 20.0, 100.0, 50.0);
    let mut inner = rect_mask(20.0, 30.0, 40.0, 10.0);

    for id in 0..1_000 {
        backend.target.id = RenderTargetId(id);
        push(&mut manager, &mut backend, &mut outer);
        push(&mut manager, &mut backend, &mut inner);
        assert_eq!(manager.scissored_target_count(), 1);

        pop(&mut manager, &mut backend, &inner);
        assert_eq!(manager.scissor_depth(backend.target_id()), 1);
        pop(&mut manager, &mut backend, &outer);
        assert!(!manager.scissor_active(backend.target_id()));
        backend.take_commands();
    }

    assert_eq!(manager.scissored_target_count(), 0);
    assert_eq!(backend.graphics.scissor, None);
}

#[test]
fn context_change_drops_pooled_filters() {
    let mut manager = MaskManager::new();
    let mut backend = backend();
    let mut sprite = sprite_mask(1, 0.0, 0.0, (32, 32));

    push(&mut manager, &mut backend, &mut sprite);
    pop(&mut manager, &mut backend, &sprite);
    let stale = manager.alpha_mask_pool_entry(0).unwrap();

    manager.on_context_change();
    assert_eq!(manager.alpha_mask_pool_len(), 0);
    assert!(manager.alpha_mask_pool_entry(0).is_err());

    push(&mut manager, &mut backend, &mut sprite);
    assert!(!Rc::ptr_eq(&stale, &manager.alpha_mask_pool_entry(0).unwrap()));
    pop(&mut manager, &mut backend, &sprite);

    manager.destroy();
    assert_eq!(manager.alpha_mask_pool_len(), 0);
}
