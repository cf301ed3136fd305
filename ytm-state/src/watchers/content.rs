//! Text content watchers

use std::sync::Arc;

use page_tree::{ObserveOptions, Selector};

use super::{Attachment, LastValue, WatchContext};
use crate::field::Field;
use crate::reader::SnapshotReader;

/// Re-read `field` whenever the children of the matched node change
pub(crate) fn watch_content(ctx: &WatchContext, field: Field, selector: &Selector) -> Option<Attachment> {
    let node = ctx.doc.query_selector(selector)?;
    let last = LastValue::new(ctx.reader().read_field(field));
    let selectors = Arc::clone(&ctx.selectors);
    let bus = ctx.bus.clone();

    let handle = ctx.doc.observe(node, ObserveOptions::child_list(), move |records, doc| {
        let reader = SnapshotReader::new(doc.clone(), Arc::clone(&selectors));
        for _ in records {
            let value = reader.read_field(field);
            if last.replace(&value) {
                WatchContext::publish(&bus, value);
            }
        }
    });
    Some(Attachment::Observer(handle))
}
