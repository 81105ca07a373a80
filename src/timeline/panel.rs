use dioxus::prelude::*;

use crate::constants::{
    BG_BASE, BG_ELEVATED, BG_SURFACE, BORDER_DEFAULT, EXPORT_TIMEBASE_FPS,
    PIXELS_PER_SECOND_MAX, PIXELS_PER_SECOND_MIN, TEXT_DIM, TEXT_MUTED,
};
use crate::core::extract::TimelineItem;

use super::clip_element::ClipElement;
use super::playback_controls::PlaybackBtn;
use super::ruler::TimeRuler;
use super::{RULER_HEIGHT_PX, TRACK_STRIP_HEIGHT_PX};

/// Main timeline panel component
#[component]
pub fn TimelinePanel(
    height: f64,
    collapsed: bool,
    is_resizing: bool,
    on_toggle: EventHandler<MouseEvent>,
    // Timeline data
    items: Vec<TimelineItem>,
    /// Interval boundaries from the layout engine, `items.len() + 1` entries.
    starts: Vec<f64>,
    // Timeline state
    current_time: f64,
    duration: f64,
    zoom: f64,
    is_playing: bool,
    active_index: Option<usize>,
    // Callbacks
    on_seek: EventHandler<f64>,
    on_zoom_change: EventHandler<f64>,
    on_play_pause: EventHandler<MouseEvent>,
    on_clip_click: EventHandler<usize>,
    on_export: EventHandler<MouseEvent>,
) -> Element {
    let icon = if collapsed { "▲" } else { "▼" };
    let play_icon = if is_playing { "⏸" } else { "▶" };
    let export_enabled = !items.is_empty();

    // Only apply transition when NOT resizing
    let transition = if is_resizing { "none" } else { "height 0.2s ease, min-height 0.2s ease" };

    let header_cursor = if collapsed { "pointer" } else { "default" };
    let header_class = if collapsed { "collapsed-rail" } else { "" };

    let fps = EXPORT_TIMEBASE_FPS as f64;
    let fps_i = EXPORT_TIMEBASE_FPS as u64;

    // Format time as HH:MM:SS:FF at the export timebase.
    let format_time = |t: f64| -> String {
        let total_frames = (t * fps).round().max(0.0) as u64;
        let frames = total_frames % fps_i;
        let total_seconds = total_frames / fps_i;
        let seconds = total_seconds % 60;
        let total_minutes = total_seconds / 60;
        let minutes = total_minutes % 60;
        let hours = total_minutes / 60;
        format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
    };
    let timecode = format_time(current_time);

    let content_width = (duration * zoom).max(1.0);
    // Snap the playhead to a frame boundary for visual alignment and keep it
    // inside the content so it never widens the scroll area.
    let playhead_pos = (((current_time * fps).round() / fps) * zoom)
        .min(content_width - 1.0)
        .max(0.0);

    let export_color = if export_enabled { TEXT_MUTED } else { TEXT_DIM };
    let export_cursor = if export_enabled { "pointer" } else { "default" };

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column;
                height: {height}px; min-height: {height}px;
                background-color: {BG_ELEVATED};
                transition: {transition};
                overflow: hidden;
            ",

            // Header
            div {
                class: "{header_class}",
                style: "
                    display: flex; align-items: center; justify-content: space-between;
                    height: 32px; padding: 0 14px;
                    background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                    flex-shrink: 0;
                    cursor: {header_cursor};
                ",
                onclick: move |e| {
                    if collapsed {
                        on_toggle.call(e);
                    }
                },

                // Left: Timeline label + zoom controls
                div {
                    style: "display: flex; align-items: center; gap: 12px;",
                    onclick: move |e| e.stop_propagation(),
                    span { style: "font-size: 11px; font-weight: 500; color: {TEXT_MUTED}; text-transform: uppercase; letter-spacing: 0.5px;", "Timeline" }

                    // Zoom controls
                    div {
                        style: "display: flex; align-items: center; gap: 4px;",
                        button {
                            class: "collapse-btn",
                            style: "width: 20px; height: 20px; border: none; border-radius: 3px; background: transparent; color: {TEXT_MUTED}; font-size: 12px; cursor: pointer; display: flex; align-items: center; justify-content: center;",
                            onclick: move |_| on_zoom_change.call((zoom * 0.8).max(PIXELS_PER_SECOND_MIN)),
                            "−"
                        }
                        span {
                            style: "font-size: 10px; color: {TEXT_DIM}; min-width: 40px; text-align: center;",
                            "{zoom as i32}px/s"
                        }
                        button {
                            class: "collapse-btn",
                            style: "width: 20px; height: 20px; border: none; border-radius: 3px; background: transparent; color: {TEXT_MUTED}; font-size: 12px; cursor: pointer; display: flex; align-items: center; justify-content: center;",
                            onclick: move |_| on_zoom_change.call((zoom * 1.25).min(PIXELS_PER_SECOND_MAX)),
                            "+"
                        }
                    }
                }

                // Center: Playback controls
                div {
                    style: "display: flex; align-items: center; gap: 4px;",
                    onclick: move |e| e.stop_propagation(),
                    PlaybackBtn {
                        icon: "⏮",
                        on_click: move |_| on_seek.call(0.0),
                    }
                    PlaybackBtn {
                        icon: "|◀",
                        on_click: move |_| {
                            // Snap to previous round second
                            let t = (current_time - 0.01).floor().max(0.0);
                            on_seek.call(t);
                        },
                    }
                    PlaybackBtn {
                        icon: play_icon,
                        primary: true,
                        on_click: move |e| on_play_pause.call(e),
                    }
                    PlaybackBtn {
                        icon: "▶|",
                        on_click: move |_| {
                            // Snap to next round second
                            let t = (current_time.floor() + 1.0).min(duration);
                            on_seek.call(t);
                        },
                    }
                    PlaybackBtn {
                        icon: "⏭",
                        on_click: move |_| on_seek.call(duration),
                    }
                }

                // Right: Timecode + export + collapse button
                div {
                    style: "display: flex; align-items: center; gap: 12px;",
                    onclick: move |e| e.stop_propagation(),
                    span {
                        style: "font-family: 'SF Mono', Consolas, monospace; font-size: 11px; color: {TEXT_DIM};",
                        "{timecode}"
                    }
                    button {
                        class: "collapse-btn",
                        style: "height: 22px; padding: 0 10px; border: 1px solid {BORDER_DEFAULT}; border-radius: 4px; background: transparent; color: {export_color}; font-size: 10px; cursor: {export_cursor};",
                        title: "Export FCP7 XML",
                        disabled: !export_enabled,
                        onclick: move |e| {
                            if export_enabled {
                                on_export.call(e);
                            }
                        },
                        "Export XML"
                    }
                    button {
                        class: "collapse-btn",
                        style: "width: 24px; height: 24px; border: none; border-radius: 4px; background: transparent; color: {TEXT_MUTED}; font-size: 10px; cursor: pointer; display: flex; align-items: center; justify-content: center;",
                        onclick: move |e| {
                            e.stop_propagation();
                            on_toggle.call(e);
                        },
                        "{icon}"
                    }
                }
            }

            if !collapsed {
                if items.is_empty() {
                    div {
                        style: "flex: 1; display: flex; align-items: center; justify-content: center; color: {TEXT_DIM}; font-size: 12px;",
                        "No clips yet - generate videos or keyframes in the scene board first."
                    }
                } else {
                    // Single scrollable strip: sticky ruler + one video track.
                    div {
                        style: "flex: 1; overflow-x: auto; overflow-y: hidden; position: relative;",

                        div {
                            style: "
                                min-width: {content_width}px;
                                display: flex;
                                flex-direction: column;
                                position: relative;
                            ",

                            // Ruler row - click anywhere to seek
                            div {
                                style: "
                                    height: {RULER_HEIGHT_PX}px;
                                    min-height: {RULER_HEIGHT_PX}px;
                                    position: sticky;
                                    top: 0;
                                    z-index: 15;
                                    background-color: {BG_SURFACE};
                                    border-bottom: 1px solid {BORDER_DEFAULT};
                                    cursor: pointer;
                                    overflow: hidden;
                                ",
                                onmousedown: move |e| {
                                    e.prevent_default();
                                    // element_coordinates is relative to the ruler,
                                    // which lives in scroll space
                                    let x = e.element_coordinates().x;
                                    let t = (x / zoom).clamp(0.0, duration);
                                    let snapped = ((t * fps).round() / fps).clamp(0.0, duration);
                                    on_seek.call(snapped);
                                },

                                TimeRuler {
                                    duration: duration,
                                    zoom: zoom,
                                }

                                // Playhead indicator on ruler
                                div {
                                    style: "
                                        position: absolute;
                                        left: {playhead_pos}px;
                                        top: 0;
                                        width: 1px;
                                        height: 100%;
                                        background-color: #ef4444;
                                        pointer-events: none;
                                    ",
                                }
                                // Playhead handle (triangle) - purely visual
                                div {
                                    style: "
                                        position: absolute;
                                        left: {playhead_pos - 5.0}px;
                                        top: 0;
                                        width: 0;
                                        height: 0;
                                        border-left: 6px solid transparent;
                                        border-right: 6px solid transparent;
                                        border-top: 8px solid #ef4444;
                                        pointer-events: none;
                                    ",
                                }
                            }

                            // The single video track
                            div {
                                style: "
                                    height: {TRACK_STRIP_HEIGHT_PX}px;
                                    min-width: {content_width}px;
                                    background-color: {BG_BASE};
                                    position: relative;
                                ",
                                onmousedown: move |e| {
                                    let x = e.element_coordinates().x;
                                    let t = (x / zoom).clamp(0.0, duration);
                                    on_seek.call(t);
                                },

                                for (index, item) in items.iter().enumerate() {
                                    ClipElement {
                                        key: "{item.id}",
                                        index: index,
                                        item_id: item.id.clone(),
                                        kind: item.kind,
                                        label: item.label.clone(),
                                        left: starts.get(index).copied().unwrap_or(0.0) * zoom,
                                        width: item.duration_seconds * zoom,
                                        // A video file can't tile as a CSS background; drop it
                                        thumb_url: item
                                            .thumb
                                            .as_ref()
                                            .filter(|thumb| !thumb.is_video_file())
                                            .map(|thumb| thumb.display_url()),
                                        playable: item.media.is_some(),
                                        active: active_index == Some(index),
                                        on_click: move |index| on_clip_click.call(index),
                                    }
                                }

                                // Playhead line overlaying the track
                                div {
                                    style: "
                                        position: absolute;
                                        left: {playhead_pos}px;
                                        top: 0;
                                        width: 1px;
                                        height: 100%;
                                        background-color: #ef4444;
                                        pointer-events: none;
                                        z-index: 10;
                                    ",
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
