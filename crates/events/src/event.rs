use chrono::{DateTime, Utc};

/// A notification about something that already happened to a basket.
///
/// Implementors are plain snapshots: the record as it was right after the
/// write, tagged with a dotted type name (`"basket.item.created"`) and a
/// payload schema version so bus subscribers can filter and upgrade.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    /// Payload schema version; bump when the snapshot shape changes.
    fn version(&self) -> u32;

    /// Clock time of the write the event reports.
    fn occurred_at(&self) -> DateTime<Utc>;
}
