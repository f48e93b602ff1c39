//! DocSleuth application icon generator.
//!
//! Produces a procedural icon: a document page with ruled text lines and
//! a magnifying glass over its lower-right corner. The icon is rendered
//! at an arbitrary resolution as RGBA pixel data for the window icon.

/// Generate a DocSleuth icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    let rgba = render_icon(size);
    egui::IconData {
        rgba,
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // ── Layout ──────────────────────────────────────────────────
    let page_left = s * 0.12;
    let page_top = s * 0.06;
    let page_right = s * 0.74;
    let page_bottom = s * 0.90;
    let fold = s * 0.16;

    let lens_cx = s * 0.62;
    let lens_cy = s * 0.62;
    let lens_r = s * 0.19;
    let ring_w = s * 0.05;
    let h_start = (lens_cx + lens_r * 0.75, lens_cy + lens_r * 0.75);
    let h_end = (s * 0.93, s * 0.93);
    let h_half_w = s * 0.05;

    let page_col = [0xe4, 0xe4, 0xe8];
    let fold_col = [0xb8, 0xb8, 0xc4];
    let line_col = [0x89, 0xb4, 0xfa];
    let ring_col = [0xf9, 0xe2, 0xaf];
    let handle_col = [0x70, 0x78, 0x85];

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let mut col = [0u8; 3];
            let mut alpha = 0.0f32;

            // 1. Page with a folded top-right corner. ───────────
            let fold_cut = (px - (page_right - fold)) + (page_top + fold - py);
            let inside_page = px > page_left
                && px < page_right
                && py > page_top
                && py < page_bottom
                && fold_cut < fold;
            if inside_page {
                let edge = (px - page_left)
                    .min(page_right - px)
                    .min(py - page_top)
                    .min(page_bottom - py)
                    .min((fold - fold_cut) / std::f32::consts::SQRT_2);
                let aa = edge.clamp(0.0, 1.0);
                col = page_col;
                alpha = aa;

                // Folded flap.
                if px > page_right - fold && py < page_top + fold && fold_cut > fold * 0.55 {
                    col = fold_col;
                }

                // Ruled text lines.
                let rel = (py - page_top) / (page_bottom - page_top);
                let line_pos = (rel * 7.0).fract();
                if rel > 0.22
                    && rel < 0.86
                    && line_pos < 0.28
                    && px > page_left + s * 0.08
                    && px < page_right - s * 0.08
                {
                    col = line_col;
                }
            }

            // 2. Lens: tint whatever is beneath. ────────────────
            let dx = px - lens_cx;
            let dy = py - lens_cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < lens_r {
                let glass = 0.25 * smooth_edge(dist, lens_r);
                col = [
                    lerp_c(col[0], 0xff, glass),
                    lerp_c(col[1], 0xff, glass),
                    lerp_c(col[2], 0xff, glass),
                ];
                alpha = alpha + (1.0 - alpha) * 0.6 * smooth_edge(dist, lens_r);
            }

            // 3. Ring. ───────────────────────────────────────────
            let ring_alpha = smooth_edge_inv(dist, lens_r) * smooth_edge(dist, lens_r + ring_w);
            if ring_alpha > 0.0 {
                col = [
                    lerp_c(col[0], ring_col[0], ring_alpha),
                    lerp_c(col[1], ring_col[1], ring_alpha),
                    lerp_c(col[2], ring_col[2], ring_alpha),
                ];
                alpha = alpha + (1.0 - alpha) * ring_alpha;
            }

            // 4. Handle. ─────────────────────────────────────────
            let ld = point_to_seg_dist(px, py, h_start.0, h_start.1, h_end.0, h_end.1);
            if ld < h_half_w + 1.5 && dist > lens_r + ring_w * 0.5 {
                let handle_alpha = smooth_edge(ld, h_half_w);
                col = [
                    lerp_c(col[0], handle_col[0], handle_alpha),
                    lerp_c(col[1], handle_col[1], handle_alpha),
                    lerp_c(col[2], handle_col[2], handle_alpha),
                ];
                alpha = alpha + (1.0 - alpha) * handle_alpha;
            }

            let idx = ((y * size + x) * 4) as usize;
            pixels[idx] = col[0];
            pixels[idx + 1] = col[1];
            pixels[idx + 2] = col[2];
            pixels[idx + 3] = (alpha * 255.0).clamp(0.0, 255.0) as u8;
        }
    }

    pixels
}

// ── Helpers ─────────────────────────────────────────────────────

/// Smooth anti-aliased edge (1 → 0 as `dist` crosses `edge`).
fn smooth_edge(dist: f32, edge: f32) -> f32 {
    let d = dist - edge;
    if d < -1.0 {
        1.0
    } else if d > 1.0 {
        0.0
    } else {
        0.5 - d * 0.5
    }
}

/// Inverted smooth edge (0 → 1 as `dist` crosses `edge` going up).
fn smooth_edge_inv(dist: f32, edge: f32) -> f32 {
    1.0 - smooth_edge(dist, edge)
}

/// Perpendicular distance from a point to a line segment.
fn point_to_seg_dist(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let abx = bx - ax;
    let aby = by - ay;
    let len_sq = abx * abx + aby * aby;
    if len_sq < 0.0001 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    let t = (((px - ax) * abx + (py - ay) * aby) / len_sq).clamp(0.0, 1.0);
    ((px - (ax + t * abx)).powi(2) + (py - (ay + t * aby)).powi(2)).sqrt()
}

/// Linear interpolation for a single colour channel.
fn lerp_c(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 * (1.0 - t) + b as f32 * t).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_buffer_size() {
        let icon = generate_icon(32);
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);
        assert_eq!((icon.width, icon.height), (32, 32));
    }

    #[test]
    fn test_icon_has_transparent_corner_and_opaque_page() {
        let size = 64;
        let px = render_icon(size);
        let alpha = |x: u32, y: u32| px[((y * size + x) * 4 + 3) as usize];
        assert_eq!(alpha(0, 0), 0, "top-left corner should be transparent");
        assert!(alpha(16, 40) > 200, "page body should be opaque");
    }
}
