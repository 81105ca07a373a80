use std::path::PathBuf;

use dioxus::prelude::*;

use crate::constants::{
    ACCENT_IMAGE, ACCENT_VIDEO, BG_ELEVATED, BG_SURFACE, BORDER_DEFAULT, BORDER_SUBTLE,
    TEXT_DIM, TEXT_MUTED, TEXT_SECONDARY,
};
use crate::state::{GenerationStatus, MediaSource, Scene};

/// Left panel listing the storyboard scenes in order. Clicking a card seeks
/// the timeline to that scene's first clip.
#[component]
pub fn SceneStrip(
    width: f64,
    collapsed: bool,
    is_resizing: bool,
    scenes: Vec<Scene>,
    work_dir: Option<PathBuf>,
    active_scene: Option<usize>,
    on_toggle: EventHandler<MouseEvent>,
    on_scene_click: EventHandler<usize>,
    on_generate_video: EventHandler<usize>,
    on_generate_frame: EventHandler<usize>,
) -> Element {
    let icon = if collapsed { "▶" } else { "◀" };
    let transition = if is_resizing { "none" } else { "width 0.2s ease, min-width 0.2s ease" };
    let panel_width = if collapsed { 40.0 } else { width };

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column;
                width: {panel_width}px; min-width: {panel_width}px;
                background-color: {BG_ELEVATED}; border-right: 1px solid {BORDER_DEFAULT};
                transition: {transition};
                overflow: hidden;
            ",

            // Header
            div {
                style: "
                    display: flex; align-items: center; justify-content: space-between;
                    height: 32px; padding: 0 10px;
                    background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                    flex-shrink: 0;
                ",
                if !collapsed {
                    span {
                        style: "font-size: 11px; font-weight: 500; color: {TEXT_MUTED}; text-transform: uppercase; letter-spacing: 0.5px;",
                        "Scenes"
                    }
                }
                button {
                    class: "collapse-btn",
                    style: "width: 24px; height: 24px; border: none; border-radius: 4px; background: transparent; color: {TEXT_MUTED}; font-size: 10px; cursor: pointer; display: flex; align-items: center; justify-content: center;",
                    onclick: move |e| on_toggle.call(e),
                    "{icon}"
                }
            }

            if !collapsed {
                if scenes.is_empty() {
                    div {
                        style: "flex: 1; display: flex; align-items: center; justify-content: center; padding: 16px; color: {TEXT_DIM}; font-size: 11px; text-align: center;",
                        "Open a storyboard to see its scenes here."
                    }
                } else {
                    div {
                        style: "flex: 1; overflow-y: auto; padding: 8px; display: flex; flex-direction: column; gap: 6px;",

                        for (index, scene) in scenes.iter().enumerate() {
                            SceneCard {
                                key: "scene-{index}",
                                index: index,
                                scene: scene.clone(),
                                work_dir: work_dir.clone(),
                                active: active_scene == Some(index),
                                on_click: move |index| on_scene_click.call(index),
                                on_generate_video: move |index| on_generate_video.call(index),
                                on_generate_frame: move |index| on_generate_frame.call(index),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SceneCard(
    index: usize,
    scene: Scene,
    work_dir: Option<PathBuf>,
    active: bool,
    on_click: EventHandler<usize>,
    on_generate_video: EventHandler<usize>,
    on_generate_frame: EventHandler<usize>,
) -> Element {
    let label = if !scene.description.is_empty() {
        scene.description.clone()
    } else if let Some(shot_id) = scene.shot_id {
        format!("Shot {shot_id}")
    } else {
        format!("Shot {}", index + 1)
    };

    let work_dir = work_dir.unwrap_or_default();
    let thumb = scene
        .thumb_url()
        .and_then(|raw| MediaSource::classify(raw, &work_dir))
        // The card thumb is an img element; a video URL would render blank.
        .filter(|source| !source.is_video_file())
        .map(|source| source.display_url());

    // One-line status chip describing where generation stands.
    let (chip_text, chip_color) = scene_chip(&scene);

    let border = if active {
        format!("1px solid {ACCENT_VIDEO}")
    } else {
        format!("1px solid {BORDER_SUBTLE}")
    };

    rsx! {
        div {
            style: "
                display: flex; gap: 8px; padding: 6px;
                background-color: {BG_SURFACE}; border: {border}; border-radius: 5px;
                cursor: pointer;
            ",
            onclick: move |_| on_click.call(index),

            // Thumbnail
            div {
                style: "width: 64px; height: 40px; border-radius: 3px; background-color: #000; overflow: hidden; flex-shrink: 0;",
                if let Some(url) = thumb {
                    img {
                        src: "{url}",
                        style: "width: 100%; height: 100%; object-fit: cover;",
                    }
                }
            }

            div {
                style: "display: flex; flex-direction: column; justify-content: space-between; min-width: 0; flex: 1;",
                span {
                    style: "font-size: 11px; color: {TEXT_SECONDARY}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                    "{label}"
                }
                span {
                    style: "font-size: 9px; color: {chip_color};",
                    "{chip_text}"
                }
            }

            div {
                style: "display: flex; flex-direction: column; gap: 2px; justify-content: center; flex-shrink: 0;",
                button {
                    class: "collapse-btn",
                    style: "width: 20px; height: 18px; border: none; border-radius: 3px; background: transparent; color: {ACCENT_VIDEO}; font-size: 10px; cursor: pointer;",
                    title: "Generate video for this scene",
                    onclick: move |e| {
                        e.stop_propagation();
                        on_generate_video.call(index);
                    },
                    "▶"
                }
                button {
                    class: "collapse-btn",
                    style: "width: 20px; height: 18px; border: none; border-radius: 3px; background: transparent; color: {ACCENT_IMAGE}; font-size: 10px; cursor: pointer;",
                    title: "Generate a keyframe for this scene",
                    onclick: move |e| {
                        e.stop_propagation();
                        on_generate_frame.call(index);
                    },
                    "✚"
                }
            }
        }
    }
}

/// Summarize a scene's media state for the card chip.
fn scene_chip(scene: &Scene) -> (String, &'static str) {
    if scene
        .videos
        .iter()
        .any(|video| !video.status.is_terminal())
    {
        return ("generating video...".to_string(), TEXT_MUTED);
    }
    if scene.preferred_video().is_some() {
        return ("video".to_string(), ACCENT_VIDEO);
    }
    let frames = scene.frame_groups().len();
    if frames > 0 {
        let noun = if frames == 1 { "frame" } else { "frames" };
        return (format!("{frames} {noun}"), ACCENT_IMAGE);
    }
    if scene
        .videos
        .iter()
        .any(|video| video.status == GenerationStatus::Failed)
    {
        return ("generation failed".to_string(), "#ef4444");
    }
    ("no media".to_string(), TEXT_DIM)
}
