//! Root application component.
//!
//! Owns the loaded storyboard document, the derived timeline layout, and the
//! panel chrome. Everything below here is driven by signals; the document is
//! the single source of truth and the timeline is rebuilt from it whenever it
//! changes.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use dioxus::prelude::*;
use serde_json::json;

use crate::components::{PreviewPanel, SceneStrip};
use crate::constants::{
    BG_BASE, BG_HOVER, BG_SURFACE, BORDER_DEFAULT, BORDER_STRONG, EXPORT_TIMEBASE_FPS,
    PANEL_DEFAULT_WIDTH, PANEL_MAX_WIDTH, PANEL_MIN_WIDTH, PLAYBACK_TICK_MS, TEXT_DIM,
    TEXT_MUTED, TEXT_PRIMARY, TIMELINE_COLLAPSED_HEIGHT, TIMELINE_DEFAULT_HEIGHT,
};
use crate::core::extract::extract_timeline_items;
use crate::core::fcp_xml::build_fcp_xml;
use crate::core::generation::{
    spawn_generation_job, GenerationJobHandle, GenerationKind, GenerationOutcome,
};
use crate::core::layout::TimelineLayout;
use crate::core::extract::TimelineItemKind;
use crate::state::{GenerationStatus, ImageRecord, Storyboard, VideoRecord};
use crate::timeline::TimelinePanel;

const TIMELINE_MIN_HEIGHT: f64 = 140.0;
const TIMELINE_MAX_HEIGHT: f64 = 500.0;

const BACKEND_URL_ENV: &str = "STORYBOARD_BACKEND_URL";
const BACKEND_URL_DEFAULT: &str = "http://127.0.0.1:8000";

fn backend_base_url() -> String {
    std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| BACKEND_URL_DEFAULT.to_string())
}

/// Re-derive the timeline from the document. Keeps the playhead where it was,
/// clamped into the new duration.
fn rebuild_timeline(storyboard: Signal<Storyboard>, mut layout: Signal<TimelineLayout>) {
    let board = storyboard.read();
    let work_dir = board.work_dir.clone().unwrap_or_default();
    let items = extract_timeline_items(&board, &work_dir);
    layout.write().set_items(items);
}

/// Write the document back to its file, if it has one. Failures are reported
/// but never block the UI.
fn persist_storyboard(storyboard: Signal<Storyboard>, path: Option<&PathBuf>) {
    let Some(path) = path else {
        return;
    };
    if let Err(err) = storyboard.read().save_to(path) {
        eprintln!("Failed to save storyboard to {}: {err}", path.display());
    }
}

fn apply_video_outcome(record: &mut VideoRecord, result: Result<GenerationOutcome, String>) {
    match result {
        Ok(GenerationOutcome::Completed { urls }) => {
            record.status = GenerationStatus::Completed;
            record.video_urls = urls;
        }
        Ok(GenerationOutcome::Failed { message }) | Err(message) => {
            record.status = GenerationStatus::Failed;
            record.error_message = Some(message);
        }
        Ok(GenerationOutcome::Overtime) => {
            record.status = GenerationStatus::Overtime;
        }
    }
}

fn apply_image_outcome(record: &mut ImageRecord, result: Result<GenerationOutcome, String>) {
    match result {
        Ok(GenerationOutcome::Completed { urls }) => {
            record.status = GenerationStatus::Completed;
            record.image_urls = urls;
        }
        Ok(GenerationOutcome::Failed { message }) | Err(message) => {
            record.status = GenerationStatus::Failed;
            record.error_message = Some(message);
        }
        Ok(GenerationOutcome::Overtime) => {
            record.status = GenerationStatus::Overtime;
        }
    }
}

pub fn App() -> Element {
    let mut storyboard = use_signal(Storyboard::default);
    let mut storyboard_path = use_signal(|| None::<PathBuf>);
    let mut layout = use_signal(TimelineLayout::default);
    let mut status_line = use_signal(|| None::<String>);

    // Running generation jobs, cancelled wholesale when another document is
    // opened.
    let mut jobs = use_signal(Vec::<GenerationJobHandle>::new);

    // Panel chrome
    let mut left_width = use_signal(|| PANEL_DEFAULT_WIDTH);
    let mut left_collapsed = use_signal(|| false);
    let mut timeline_height = use_signal(|| TIMELINE_DEFAULT_HEIGHT);
    let mut timeline_collapsed = use_signal(|| false);

    // Resize drag bookkeeping
    let mut dragging = use_signal(|| None::<&'static str>);
    let mut drag_start_pos = use_signal(|| 0.0);
    let mut drag_start_size = use_signal(|| 0.0);

    // Playback tick loop. Wall-clock deltas rather than a fixed step, so a
    // slow frame doesn't slow the playhead.
    use_future(move || {
        let mut layout = layout;
        async move {
            let mut last_tick = Instant::now();
            loop {
                tokio::time::sleep(Duration::from_millis(PLAYBACK_TICK_MS)).await;
                if !layout.read().playback.is_playing {
                    last_tick = Instant::now();
                    continue;
                }

                let now = Instant::now();
                let delta = now.saturating_duration_since(last_tick);
                last_tick = now;

                layout.write().advance(delta.as_secs_f64());
            }
        }
    });

    let open_storyboard = move |_| {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Storyboard JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        match Storyboard::load(&path) {
            Ok(board) => {
                for job in jobs.write().drain(..) {
                    job.cancel();
                }
                storyboard.set(board);
                storyboard_path.set(Some(path));
                rebuild_timeline(storyboard, layout);
                status_line.set(None);
            }
            Err(err) => {
                eprintln!("Failed to open storyboard {}: {err}", path.display());
                status_line.set(Some(format!("Failed to open storyboard: {err}")));
            }
        }
    };

    let export_xml = move |_| {
        let xml;
        let default_name;
        {
            let board = storyboard.read();
            let timeline = layout.read();
            if timeline.is_empty() {
                return;
            }
            let name = board.export_name();
            xml = build_fcp_xml(
                timeline.items(),
                timeline.boundaries(),
                &name,
                EXPORT_TIMEBASE_FPS,
            );
            default_name = format!("{name}.xml");
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("FCP7 XML", &["xml"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, xml) {
            Ok(()) => status_line.set(Some(format!("Exported {}", path.display()))),
            Err(err) => {
                eprintln!("Failed to write {}: {err}", path.display());
                status_line.set(Some(format!("Export failed: {err}")));
            }
        }
    };

    // Kick off a generation for one scene. A placeholder record lands in the
    // document immediately so the scene card shows progress; the job result
    // replaces it when the backend finishes.
    let mut start_generation = move |scene_index: usize, kind: GenerationKind| {
        let prompt = {
            let board = storyboard.read();
            match board.scene_board.get(scene_index) {
                Some(scene) => scene.description.clone(),
                None => return,
            }
        };

        let marker = uuid::Uuid::new_v4().to_string();
        {
            let mut board = storyboard.write();
            if let Some(scene) = board.scene_board.get_mut(scene_index) {
                let created_at = Some(chrono::Utc::now().timestamp_millis());
                match kind {
                    GenerationKind::Video => scene.videos.push(VideoRecord {
                        status: GenerationStatus::IsLoading,
                        created_at,
                        task_id: Some(marker.clone()),
                        ..Default::default()
                    }),
                    // Each keyframe generation opens a fresh group; retries
                    // of an existing group would push into it instead.
                    GenerationKind::Image => scene.picture.frames.push(vec![ImageRecord {
                        status: GenerationStatus::IsLoading,
                        created_at,
                        task_id: Some(marker.clone()),
                        ..Default::default()
                    }]),
                }
            }
        }
        persist_storyboard(storyboard, storyboard_path.read().as_ref());

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let payload = json!({ "prompt": prompt });
        let job = spawn_generation_job(backend_base_url(), kind, payload, move |_, result| {
            let _ = tx.send(result);
        });
        jobs.write().push(job);

        spawn(async move {
            // A cancelled job drops the sender without a message.
            let Some(result) = rx.recv().await else {
                return;
            };
            if let Err(message) = &result {
                eprintln!("Generation failed: {message}");
            }
            {
                let mut board = storyboard.write();
                let Some(scene) = board.scene_board.get_mut(scene_index) else {
                    return;
                };
                match kind {
                    GenerationKind::Video => {
                        let record = scene
                            .videos
                            .iter_mut()
                            .find(|video| video.task_id.as_deref() == Some(marker.as_str()));
                        if let Some(record) = record {
                            apply_video_outcome(record, result);
                        }
                    }
                    GenerationKind::Image => {
                        let record = scene
                            .picture
                            .frames
                            .iter_mut()
                            .flatten()
                            .find(|image| image.task_id.as_deref() == Some(marker.as_str()));
                        if let Some(record) = record {
                            apply_image_outcome(record, result);
                        }
                    }
                }
            }
            persist_storyboard(storyboard, storyboard_path.read().as_ref());
            rebuild_timeline(storyboard, layout);
            jobs.write().retain(|job| !job.is_finished());
        });
    };


    // Snapshot the layout state once per render for the child components.
    let (items, starts, current_time, duration, zoom, is_playing, active_clip) = {
        let timeline = layout.read();
        (
            timeline.items().to_vec(),
            timeline.boundaries().to_vec(),
            timeline.playback.current_time_seconds,
            timeline.total_duration(),
            timeline.playback.pixels_per_second,
            timeline.playback.is_playing,
            timeline.active_clip(),
        )
    };
    let active_index = active_clip.map(|clip| clip.index);
    let active_item = active_index.and_then(|index| items.get(index).cloned());
    let active_scene = active_item.as_ref().map(|item| item.scene_index);

    // Candidate takes behind the active clip, for the preview picker.
    let active_target = active_item
        .as_ref()
        .map(|item| (item.scene_index, item.frame_index, item.kind));
    let candidates: Vec<(usize, String, bool)> = active_target
        .map(|(scene_index, frame_index, kind)| {
            let board = storyboard.read();
            let Some(scene) = board.scene_board.get(scene_index) else {
                return Vec::new();
            };
            match kind {
                TimelineItemKind::Video => scene
                    .videos
                    .iter()
                    .enumerate()
                    .map(|(index, video)| {
                        (index, format!("Take {}", index + 1), video.is_selected)
                    })
                    .collect(),
                TimelineItemKind::Image => frame_index
                    .and_then(|frame_index| scene.picture.frames.get(frame_index))
                    .map(|group| {
                        group
                            .iter()
                            .enumerate()
                            .map(|(index, image)| {
                                (index, format!("Take {}", index + 1), image.is_selected)
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            }
        })
        .unwrap_or_default();

    let select_candidate = move |candidate_index: usize| {
        let Some((scene_index, frame_index, kind)) = active_target else {
            return;
        };
        let changed = match kind {
            TimelineItemKind::Video => {
                storyboard.write().select_video(scene_index, candidate_index)
            }
            TimelineItemKind::Image => match frame_index {
                Some(frame_index) => {
                    storyboard
                        .write()
                        .select_image(scene_index, frame_index, candidate_index)
                }
                None => false,
            },
        };
        if changed {
            persist_storyboard(storyboard, storyboard_path.read().as_ref());
            rebuild_timeline(storyboard, layout);
        }
    };

    let board_name = {
        let board = storyboard.read();
        if board.name.is_empty() {
            "No storyboard loaded".to_string()
        } else {
            board.name.clone()
        }
    };
    let status_text = status_line.read().clone().unwrap_or_default();

    let timeline_h = if timeline_collapsed() {
        TIMELINE_COLLAPSED_HEIGHT
    } else {
        timeline_height()
    };
    let left_resizing = dragging() == Some("left");
    let timeline_resizing = dragging() == Some("timeline");
    let drag_cursor = match dragging() {
        Some("left") => "ew-resize",
        Some("timeline") => "ns-resize",
        _ => "default",
    };

    rsx! {
        style {
            r#"
            *, *::before, *::after {{ box-sizing: border-box; }}
            html, body {{ margin: 0; padding: 0; overflow: hidden; background-color: {BG_BASE}; }}
            body {{ -webkit-font-smoothing: antialiased; }}
            ::-webkit-scrollbar {{ width: 6px; height: 6px; }}
            ::-webkit-scrollbar-track {{ background: transparent; }}
            ::-webkit-scrollbar-thumb {{ background: {BORDER_DEFAULT}; border-radius: 3px; }}
            ::-webkit-scrollbar-thumb:hover {{ background: {BORDER_STRONG}; }}
            .collapse-btn {{ opacity: 0.6; transition: opacity 0.15s ease, background-color 0.15s ease; }}
            .collapse-btn:hover {{ opacity: 1; background-color: {BG_HOVER} !important; }}
            .resize-handle {{ transition: background-color 0.15s ease; }}
            .resize-handle:hover {{ background-color: {BORDER_STRONG} !important; }}
            .resize-handle:active {{ background-color: {BORDER_STRONG} !important; }}
            .collapsed-rail {{ transition: background-color 0.15s ease; }}
            .collapsed-rail:hover {{ background-color: {BG_HOVER} !important; }}
            "#
        }

        div {
            style: "
                display: flex; flex-direction: column;
                width: 100vw; height: 100vh;
                background-color: {BG_BASE}; color: {TEXT_PRIMARY};
                font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
                overflow: hidden; position: fixed; top: 0; left: 0;
                user-select: none;
                cursor: {drag_cursor};
            ",
            onmousemove: move |e| {
                if let Some(target) = dragging() {
                    e.prevent_default();
                    match target {
                        "left" => {
                            let delta = e.client_coordinates().x - drag_start_pos();
                            let new_w = (drag_start_size() + delta).clamp(PANEL_MIN_WIDTH, PANEL_MAX_WIDTH);
                            left_width.set(new_w);
                        }
                        "timeline" => {
                            let delta = drag_start_pos() - e.client_coordinates().y;
                            let new_h = (drag_start_size() + delta).clamp(TIMELINE_MIN_HEIGHT, TIMELINE_MAX_HEIGHT);
                            timeline_height.set(new_h);
                        }
                        _ => {}
                    }
                }
            },
            onmouseup: move |_| dragging.set(None),
            oncontextmenu: move |e| e.prevent_default(),

            // Title bar
            div {
                style: "
                    display: flex; align-items: center; gap: 12px;
                    height: 36px; padding: 0 14px;
                    background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                    flex-shrink: 0;
                ",
                span {
                    style: "font-size: 12px; font-weight: 600; color: {TEXT_PRIMARY};",
                    "Storyboard Studio"
                }
                button {
                    class: "collapse-btn",
                    style: "height: 24px; padding: 0 10px; border: 1px solid {BORDER_DEFAULT}; border-radius: 4px; background: transparent; color: {TEXT_MUTED}; font-size: 11px; cursor: pointer;",
                    onclick: open_storyboard,
                    "Open..."
                }
                span {
                    style: "font-size: 11px; color: {TEXT_MUTED}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                    "{board_name}"
                }
                span {
                    style: "margin-left: auto; font-size: 10px; color: {TEXT_DIM}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                    "{status_text}"
                }
            }

            // Main content
            div {
                style: "display: flex; flex: 1; overflow: hidden; min-height: 0;",

                SceneStrip {
                    width: left_width(),
                    collapsed: left_collapsed(),
                    is_resizing: left_resizing,
                    scenes: storyboard.read().scene_board.clone(),
                    work_dir: storyboard.read().work_dir.clone(),
                    active_scene: active_scene,
                    on_toggle: move |_| left_collapsed.set(!left_collapsed()),
                    on_scene_click: move |scene_index: usize| {
                        let start = {
                            let timeline = layout.read();
                            timeline
                                .items()
                                .iter()
                                .position(|item| item.scene_index == scene_index)
                                .map(|index| timeline.clip_start(index))
                        };
                        if let Some(start) = start {
                            layout.write().seek(start);
                        }
                    },
                    on_generate_video: move |scene_index| {
                        start_generation(scene_index, GenerationKind::Video)
                    },
                    on_generate_frame: move |scene_index| {
                        start_generation(scene_index, GenerationKind::Image)
                    },
                }

                // Left panel resize handle
                if !left_collapsed() {
                    div {
                        class: "resize-handle",
                        style: "width: 4px; cursor: ew-resize; background-color: transparent; flex-shrink: 0;",
                        onmousedown: move |e| {
                            e.prevent_default();
                            dragging.set(Some("left"));
                            drag_start_pos.set(e.client_coordinates().x);
                            drag_start_size.set(left_width());
                        },
                    }
                }

                PreviewPanel {
                    item_id: active_item.as_ref().map(|item| item.id.clone()),
                    kind: active_item.as_ref().map(|item| item.kind),
                    media_url: active_item
                        .as_ref()
                        .and_then(|item| item.media.as_ref())
                        .map(|media| media.display_url()),
                    label: active_item.as_ref().map(|item| item.label.clone()),
                    playing: is_playing,
                    current_time: current_time,
                    duration: duration,
                    candidates: candidates.clone(),
                    on_select_candidate: select_candidate,
                }
            }

            // Timeline resize handle
            if !timeline_collapsed() {
                div {
                    class: "resize-handle",
                    style: "height: 4px; cursor: ns-resize; background-color: transparent; flex-shrink: 0;",
                    onmousedown: move |e| {
                        e.prevent_default();
                        dragging.set(Some("timeline"));
                        drag_start_pos.set(e.client_coordinates().y);
                        drag_start_size.set(timeline_height());
                    },
                }
            }

            TimelinePanel {
                height: timeline_h,
                collapsed: timeline_collapsed(),
                is_resizing: timeline_resizing,
                on_toggle: move |_| timeline_collapsed.set(!timeline_collapsed()),
                items: items.clone(),
                starts: starts.clone(),
                current_time: current_time,
                duration: duration,
                zoom: zoom,
                is_playing: is_playing,
                active_index: active_index,
                on_seek: move |t| layout.write().seek(t),
                on_zoom_change: move |pixels_per_second| layout.write().set_zoom(pixels_per_second),
                on_play_pause: move |_| layout.write().toggle_playback(),
                on_clip_click: move |index| {
                    let start = layout.read().clip_start(index);
                    layout.write().seek(start);
                },
                on_export: export_xml,
            }
        }
    }
}
