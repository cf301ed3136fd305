//! Single-attribute watchers

use std::sync::Arc;

use page_tree::{ObserveOptions, Selector};
use tracing::trace;

use super::{Attachment, LastValue, WatchContext};
use crate::field::Field;
use crate::reader::SnapshotReader;

/// Observe `attribute` on the first node matching `selector`
///
/// Every record re-reads `field` through the reader, so the published value
/// always equals what `full_state()` reports at that moment.
pub(crate) fn watch_attribute(
    ctx: &WatchContext,
    field: Field,
    selector: &Selector,
    attribute: &'static str,
) -> Option<Attachment> {
    let node = ctx.doc.query_selector(selector)?;
    let last = LastValue::new(ctx.reader().read_field(field));
    let selectors = Arc::clone(&ctx.selectors);
    let bus = ctx.bus.clone();

    let handle = ctx.doc.observe(node, ObserveOptions::attribute(attribute), move |records, doc| {
        let reader = SnapshotReader::new(doc.clone(), Arc::clone(&selectors));
        for record in records {
            trace!(
                field = %field,
                attribute = ?record.attribute_name(),
                old = ?record.old_value(),
                "attribute mutated"
            );
            let value = reader.read_field(field);
            if last.replace(&value) {
                WatchContext::publish(&bus, value);
            }
        }
    });
    Some(Attachment::Observer(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldChange;
    use crate::selectors::SelectorMap;
    use event_bus::EventBus;
    use page_tree::{Document, ElementSpec};
    use parking_lot::Mutex;

    fn context(doc: &Document) -> WatchContext {
        WatchContext {
            doc: doc.clone(),
            selectors: Arc::new(SelectorMap::default().compile().unwrap()),
            bus: EventBus::new(),
        }
    }

    #[test]
    fn test_missing_node_is_dormant() {
        let doc = Document::new();
        let ctx = context(&doc);
        assert!(watch_attribute(&ctx, Field::Volume, &ctx.selectors.volume_slider, "value").is_none());
    }

    #[test]
    fn test_emits_decoded_value_once_per_change() {
        let doc = Document::new();
        let slider = doc
            .insert(
                doc.root(),
                ElementSpec::new("tp-yt-paper-slider").id("volume-slider").attr("value", "40"),
            )
            .unwrap();
        let ctx = context(&doc);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        ctx.bus.subscribe("volume", move |e| seen_cb.lock().push(e.value.clone()));

        watch_attribute(&ctx, Field::Volume, &ctx.selectors.volume_slider, "value").unwrap();

        doc.set_attribute(slider, "value", "40");
        doc.flush();
        assert!(seen.lock().is_empty());

        doc.set_attribute(slider, "value", "55");
        doc.set_attribute(slider, "value", "55");
        doc.flush();
        assert_eq!(*seen.lock(), vec![FieldChange::Volume(Some(55))]);
    }

    #[test]
    fn test_presence_attribute() {
        let doc = Document::new();
        let player = doc.insert(doc.root(), ElementSpec::new("div").id("player")).unwrap();
        let ctx = context(&doc);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        ctx.bus.subscribe_all(move |e| seen_cb.lock().push(e.value.clone()));

        watch_attribute(&ctx, Field::IsVideo, &ctx.selectors.player, "video-mode_").unwrap();

        doc.set_attribute(player, "video-mode_", "");
        doc.flush();
        doc.remove_attribute(player, "video-mode_");
        doc.flush();

        assert_eq!(
            *seen.lock(),
            vec![FieldChange::IsVideo(Some(true)), FieldChange::IsVideo(Some(false))]
        );
    }
}
