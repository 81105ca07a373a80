use dioxus::prelude::*;

use crate::constants::{
    BORDER_STRONG, BORDER_SUBTLE, EXPORT_TIMEBASE_FPS, PIXELS_PER_SECOND_MAX, TEXT_DIM,
};
use crate::utils::format_ruler_label;

const TARGET_PX_PER_LABEL: f64 = 90.0;
const LABEL_STEPS_SECONDS: &[f64] = &[0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0];

/// Smallest labeled step that keeps labels at least [`TARGET_PX_PER_LABEL`]
/// apart at the given zoom.
fn major_tick_step(zoom: f64) -> f64 {
    let wanted = (TARGET_PX_PER_LABEL / zoom.max(0.1)).max(0.5);
    for &step in LABEL_STEPS_SECONDS {
        if step >= wanted {
            return step;
        }
    }
    *LABEL_STEPS_SECONDS.last().unwrap_or(&10.0)
}

/// Tick marks and labels along the top of the timeline. The whole layer is
/// pointer-transparent; the parent owns click-to-seek.
#[component]
pub(crate) fn TimeRuler(duration: f64, zoom: f64) -> Element {
    let fps = EXPORT_TIMEBASE_FPS as f64;
    let fps_i = EXPORT_TIMEBASE_FPS as i32;

    let step = major_tick_step(zoom);
    let label_count = (duration / step).ceil() as i32 + 1;
    let content_width = duration * zoom;

    // Per-frame minor ticks appear only at maximum zoom, where they sit
    // 8px apart; any wider zoom range would mush them together.
    let show_frame_ticks = zoom >= PIXELS_PER_SECOND_MAX;

    rsx! {
        div {
            style: "position: absolute; left: 0; top: 0; width: 100%; height: 100%; pointer-events: none;",

            if show_frame_ticks {
                {
                    let last_frame = (duration * fps).ceil() as i32;
                    rsx! {
                        for frame in 0..=last_frame {
                            {
                                let x = frame as f64 / fps * zoom;
                                // Whole seconds get the tall labeled tick
                                // below; don't double-mark them.
                                let on_second = frame % fps_i == 0;

                                if !on_second && x <= content_width + 10.0 {
                                    rsx! {
                                        div {
                                            key: "frame-{frame}",
                                            style: "
                                                position: absolute;
                                                left: {x}px;
                                                bottom: 0;
                                                width: 1px;
                                                height: 4px;
                                                background-color: {BORDER_SUBTLE};
                                                pointer-events: none;
                                            ",
                                        }
                                    }
                                } else {
                                    rsx! {}
                                }
                            }
                        }
                    }
                }
            }

            for i in 0..label_count {
                {
                    let t = i as f64 * step;
                    let x = t * zoom;
                    let label = format_ruler_label(t);

                    // One spare label past the end keeps the final boundary
                    // marked.
                    if x <= content_width + 50.0 {
                        rsx! {
                            div {
                                key: "label-{i}",
                                div {
                                    style: "
                                        position: absolute;
                                        left: {x}px;
                                        bottom: 0;
                                        width: 1px;
                                        height: 10px;
                                        background-color: {BORDER_STRONG};
                                        pointer-events: none;
                                    ",
                                }
                                div {
                                    style: "
                                        position: absolute;
                                        left: {x + 4.0}px;
                                        top: 3px;
                                        font-size: 9px;
                                        color: {TEXT_DIM};
                                        font-family: 'SF Mono', Consolas, monospace;
                                        user-select: none;
                                        pointer-events: none;
                                    ",
                                    "{label}"
                                }
                            }
                        }
                    } else {
                        rsx! {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_tick_step_tracks_zoom() {
        // 40px/s wants 2.25s per label, rounds up to 5s.
        assert_eq!(major_tick_step(40.0), 5.0);
        assert_eq!(major_tick_step(80.0), 2.0);
        assert_eq!(major_tick_step(240.0), 0.5);
        // Degenerate zoom clamps instead of dividing by zero.
        assert_eq!(major_tick_step(0.0), 60.0);
    }
}
