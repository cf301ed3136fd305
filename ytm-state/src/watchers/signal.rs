//! Media signal watchers

use std::sync::Arc;

use page_tree::EventType;

use super::{Attachment, LastValue, WatchContext};
use crate::field::FieldChange;

/// Track the pause flag from the media element's `Play` / `Pause` events
pub(crate) fn watch_paused(ctx: &WatchContext) -> Option<Attachment> {
    let video = ctx.doc.query_selector(&ctx.selectors.video)?;
    let last = Arc::new(LastValue::new(FieldChange::IsPaused(ctx.reader().is_paused())));

    let handles = [(EventType::Play, false), (EventType::Pause, true)]
        .into_iter()
        .map(|(event_type, paused)| {
            let last = Arc::clone(&last);
            let bus = ctx.bus.clone();
            ctx.doc.add_event_listener(video, event_type, move |_event, _target, _doc| {
                let value = FieldChange::IsPaused(Some(paused));
                if last.replace(&value) {
                    WatchContext::publish(&bus, value);
                }
            })
        })
        .collect();
    Some(Attachment::Listeners(handles))
}
