//! Pure calculation functions for transform geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Aspect-preserving shrink-to-fit dimensions, never upscaling.
///
/// A `None` bound is unconstrained. The scale factor is the tightest
/// provided bound, capped at 1.0 (constrain only); results are rounded and
/// floored at 1 pixel.
///
/// # Examples
/// ```
/// # use pixcache::engine::calculations::fit_within;
/// // 400x200 into a 100x100 box: width binds → 100x50
/// assert_eq!(fit_within((400, 200), (Some(100), Some(100))), (100, 50));
/// // 200x400 into a 100x100 box: height binds → 50x100
/// assert_eq!(fit_within((200, 400), (Some(100), Some(100))), (50, 100));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (Option<u32>, Option<u32>)) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return source;
    }

    let mut scale = 1.0f64;
    if let Some(max_w) = bounds.0 {
        scale = scale.min(max_w as f64 / src_w as f64);
    }
    if let Some(max_h) = bounds.1 {
        scale = scale.min(max_h as f64 / src_h as f64);
    }
    if scale >= 1.0 {
        // Constrain only: never enlarge beyond the native resolution
        return source;
    }

    let w = ((src_w as f64 * scale).round() as u32).max(1);
    let h = ((src_h as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Which axis binds a cover-resize toward `target`.
///
/// `true` means the source is taller relative to the target box, so the
/// resize binds to the target width and the height overflows for cropping;
/// `false` binds to the target height. Exact integer comparison of
/// `src_w/src_h < tgt_w/tgt_h` via cross-multiplication.
pub fn binds_to_width(source: (u32, u32), target: (u32, u32)) -> bool {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    (src_w as u64) * (tgt_h as u64) < (tgt_w as u64) * (src_h as u64)
}

/// Symmetric trim margins that center `target` inside `intermediate`.
///
/// Returns `(top, left)`; the caller mirrors them to the bottom and right
/// edges. An intermediate smaller than the target (a source too small to
/// cover the box under the no-upscale rule) saturates to zero margin — the
/// result stays undersized rather than padded or upscaled.
pub fn center_margins(intermediate: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (inter_w, inter_h) = intermediate;
    let (tgt_w, tgt_h) = target;
    (
        inter_h.saturating_sub(tgt_h) / 2,
        inter_w.saturating_sub(tgt_w) / 2,
    )
}
