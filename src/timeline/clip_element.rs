use dioxus::prelude::*;

use crate::constants::{
    ACCENT_IMAGE, ACCENT_VIDEO, BG_ELEVATED, TEXT_SECONDARY,
};
use crate::core::extract::TimelineItemKind;

use super::MIN_CLIP_WIDTH_PX;

/// One clip block on the video track. Width is proportional to the item's
/// fixed duration; clicking seeks to the clip's start.
#[component]
pub(crate) fn ClipElement(
    index: usize,
    item_id: String,
    kind: TimelineItemKind,
    label: String,
    left: f64,
    width: f64,
    thumb_url: Option<String>,
    playable: bool,
    active: bool,
    on_click: EventHandler<usize>,
) -> Element {
    let clip_color = match kind {
        TimelineItemKind::Video => ACCENT_VIDEO,
        TimelineItemKind::Image => ACCENT_IMAGE,
    };
    let width = width.max(MIN_CLIP_WIDTH_PX);

    // Unplayable items stay on the track but render dashed.
    let border_style = if playable {
        format!("1px solid {}", clip_color)
    } else {
        format!("1px dashed {}", clip_color)
    };
    let outline = if active {
        format!("outline: 1px solid {}; outline-offset: -2px;", clip_color)
    } else {
        String::new()
    };
    let background = match thumb_url.as_deref() {
        Some(url) => {
            let tile = (width / 4.0).clamp(24.0, 48.0);
            format!(
                "background-color: {}; background-image: url({}); background-size: {}px 100%; background-repeat: repeat-x;",
                BG_ELEVATED, url, tile
            )
        }
        None => format!("background-color: {};", BG_ELEVATED),
    };

    rsx! {
        div {
            key: "{item_id}",
            title: "{label}",
            style: "
                position: absolute;
                left: {left}px;
                top: 2px;
                width: {width}px;
                bottom: 2px;
                {background}
                border: {border_style};
                border-radius: 4px;
                display: flex;
                align-items: flex-end;
                padding: 0 6px 4px 6px;
                overflow: hidden;
                cursor: pointer;
                user-select: none;
                {outline}
            ",
            onclick: move |e| {
                e.stop_propagation();
                on_click.call(index);
            },
            span {
                style: "font-size: 10px; color: {TEXT_SECONDARY}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; text-shadow: 0 1px 2px #000;",
                "{label}"
            }
        }
    }
}
