use dioxus::prelude::*;

use crate::constants::{
    ACCENT_VIDEO, BG_DEEPEST, BG_SURFACE, BORDER_DEFAULT,
    EXPORT_SEQUENCE_HEIGHT, EXPORT_SEQUENCE_WIDTH, EXPORT_TIMEBASE_FPS, TEXT_DIM, TEXT_MUTED,
};
use crate::core::extract::TimelineItemKind;
use crate::utils::format_clip_time;

/// Center preview. Shows the media of the clip under the playhead, or an
/// empty state when nothing is loaded yet.
#[component]
pub fn PreviewPanel(
    item_id: Option<String>,
    kind: Option<TimelineItemKind>,
    media_url: Option<String>,
    label: Option<String>,
    playing: bool,
    current_time: f64,
    duration: f64,
    /// Candidate takes for the active clip: `(index, label, selected)`.
    candidates: Vec<(usize, String, bool)>,
    on_select_candidate: EventHandler<usize>,
) -> Element {
    let time_label = format!(
        "{} / {}",
        format_clip_time(current_time),
        format_clip_time(duration)
    );
    let clip_label = label.unwrap_or_default();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; flex: 1; min-height: 0; background-color: {BG_DEEPEST};",

            div {
                style: "
                    display: grid; grid-template-columns: auto 1fr auto; align-items: center;
                    height: 32px; padding: 0 14px;
                    background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                ",
                span {
                    style: "grid-column: 1; font-size: 11px; font-weight: 500; color: {TEXT_MUTED}; text-transform: uppercase; letter-spacing: 0.5px;",
                    "Preview"
                }
                span {
                    style: "
                        grid-column: 2; justify-self: center; min-width: 0;
                        font-family: 'SF Mono', Consolas, monospace;
                        font-size: 10px; color: {TEXT_DIM};
                        white-space: nowrap; overflow: hidden; text-overflow: ellipsis;
                    ",
                    "{clip_label}"
                }
                div {
                    style: "grid-column: 3; justify-self: end; display: flex; align-items: center; gap: 6px; font-family: 'SF Mono', Consolas, monospace; font-size: 11px; color: {TEXT_DIM};",
                    span { "{EXPORT_SEQUENCE_WIDTH} x {EXPORT_SEQUENCE_HEIGHT}" }
                    span { style: "color: {TEXT_MUTED};", "@" }
                    span { "{EXPORT_TIMEBASE_FPS}" }
                }
            }

            div {
                style: "flex: 1; display: flex; align-items: center; justify-content: center; background-color: {BG_DEEPEST}; position: relative; min-height: 0; overflow: hidden;",

                {match (kind, media_url) {
                    (Some(TimelineItemKind::Video), Some(url)) => rsx! {
                        // Keyed on the item so switching clips reloads the element
                        video {
                            key: "{item_id.clone().unwrap_or_default()}",
                            src: "{url}",
                            autoplay: playing,
                            muted: true,
                            r#loop: true,
                            style: "max-width: 100%; max-height: 100%; width: auto; height: auto; background-color: #000;",
                        }
                    },
                    (Some(TimelineItemKind::Image), Some(url)) => rsx! {
                        img {
                            key: "{item_id.clone().unwrap_or_default()}",
                            src: "{url}",
                            style: "max-width: 100%; max-height: 100%; width: auto; height: auto; object-fit: contain;",
                        }
                    },
                    (Some(_), None) => rsx! {
                        div {
                            style: "display: flex; flex-direction: column; align-items: center; gap: 12px; color: {TEXT_DIM};",
                            div {
                                style: "width: 48px; height: 48px; border: 1px dashed {BORDER_DEFAULT}; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-size: 14px;",
                                "!"
                            }
                            span { style: "font-size: 12px;", "Clip has no playable media" }
                        }
                    },
                    (None, _) => rsx! {
                        div {
                            style: "display: flex; flex-direction: column; align-items: center; gap: 12px; color: {TEXT_DIM};",
                            div {
                                style: "width: 48px; height: 48px; border: 1px solid {BORDER_DEFAULT}; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-size: 14px;",
                                "?"
                            }
                            span { style: "font-size: 12px;", "No preview" }
                        }
                    },
                }}
            }

            // Candidate picker: only when the active clip has retries to
            // choose between.
            if candidates.len() > 1 {
                div {
                    style: "
                        display: flex; align-items: center; justify-content: center; gap: 6px;
                        height: 28px; flex-shrink: 0;
                        background-color: {BG_SURFACE}; border-top: 1px solid {BORDER_DEFAULT};
                    ",
                    for (candidate_index, label, selected) in candidates.iter().cloned() {
                        {
                            let border = if selected {
                                format!("1px solid {ACCENT_VIDEO}")
                            } else {
                                format!("1px solid {BORDER_DEFAULT}")
                            };
                            let color = if selected { ACCENT_VIDEO } else { TEXT_MUTED };
                            rsx! {
                                button {
                                    key: "candidate-{candidate_index}",
                                    class: "collapse-btn",
                                    style: "height: 18px; padding: 0 8px; border: {border}; border-radius: 9px; background: transparent; color: {color}; font-size: 9px; cursor: pointer;",
                                    onclick: move |_| on_select_candidate.call(candidate_index),
                                    "{label}"
                                }
                            }
                        }
                    }
                }
            }

            div {
                style: "
                    display: flex; align-items: center; justify-content: center;
                    height: 24px; flex-shrink: 0;
                    background-color: {BG_SURFACE}; border-top: 1px solid {BORDER_DEFAULT};
                    font-family: 'SF Mono', Consolas, monospace; font-size: 10px; color: {TEXT_DIM};
                ",
                "{time_label}"
            }
        }
    }
}
