//! Versioned snapshot format for a loaded dictionary.
//!
//! A snapshot is a JSON document tagged with [`SNAPSHOT_FORMAT`] and
//! [`SNAPSHOT_VERSION`]. Phrase entries are stored once and referenced by
//! position, so an entry shared by several keys stays shared after a restore.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::index::PhraseIndex;
use crate::phrase::{PhraseEntry, PhraseGroup, PhrasesByLength};
use crate::properties::{PropertyBag, PropertySchema};

pub const SNAPSHOT_FORMAT: &str = "conmap-dictionary";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct Header {
    format: String,
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    format: String,
    version: u32,
    order_independent: bool,
    schema: PropertySchema,
    entries: Vec<EntryRecord>,
    keys: Vec<KeyRecord>,
}

#[derive(Serialize, Deserialize)]
struct EntryRecord {
    elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unsorted: Option<String>,
    #[serde(default)]
    properties: PropertyBag,
}

#[derive(Serialize, Deserialize)]
struct KeyRecord {
    key: String,
    groups: Vec<GroupRecord>,
}

#[derive(Serialize, Deserialize)]
struct GroupRecord {
    length: usize,
    /// Positions in the snapshot's entry table
    entries: Vec<usize>,
}

/// Contents restored from a snapshot
pub struct Restored {
    pub index: PhraseIndex,
    pub schema: PropertySchema,
    pub order_independent: bool,
}

pub fn write_snapshot<W: Write>(
    writer: W,
    index: &PhraseIndex,
    schema: &PropertySchema,
    order_independent: bool,
) -> Result<(), SnapshotError> {
    let mut positions: HashMap<*const PhraseEntry, usize> = HashMap::new();
    let mut entries = Vec::new();
    let mut keys = Vec::with_capacity(index.len());

    for (key, phrases) in index.iter() {
        let mut groups = Vec::new();
        for (length, group) in phrases.iter() {
            let members = group
                .entries()
                .iter()
                .map(|entry| {
                    *positions.entry(Arc::as_ptr(entry)).or_insert_with(|| {
                        entries.push(EntryRecord {
                            elements: entry.elements().to_vec(),
                            unsorted: entry.unsorted().map(str::to_string),
                            properties: entry.properties().clone(),
                        });
                        entries.len() - 1
                    })
                })
                .collect();
            groups.push(GroupRecord {
                length,
                entries: members,
            });
        }
        keys.push(KeyRecord {
            key: key.to_string(),
            groups,
        });
    }

    let snapshot = Snapshot {
        format: SNAPSHOT_FORMAT.to_string(),
        version: SNAPSHOT_VERSION,
        order_independent,
        schema: schema.clone(),
        entries,
        keys,
    };

    serde_json::to_writer(writer, &snapshot)?;
    Ok(())
}

pub fn read_snapshot<R: Read>(reader: R) -> Result<Restored, SnapshotError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;

    let header = Header::deserialize(&value)?;
    if header.format != SNAPSHOT_FORMAT || header.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            format: header.format,
            version: header.version,
        });
    }

    let snapshot = Snapshot::deserialize(value)?;

    let entries: Vec<Arc<PhraseEntry>> = snapshot
        .entries
        .into_iter()
        .map(|record| {
            if record.elements.is_empty() {
                return Err(SnapshotError::InvalidFormat("entry without elements".to_string()));
            }
            Ok(Arc::new(PhraseEntry::new(record.elements, record.unsorted, record.properties)))
        })
        .collect::<Result<_, _>>()?;

    let mut index = PhraseIndex::with_capacity(snapshot.keys.len());
    for record in snapshot.keys {
        let mut groups = BTreeMap::new();
        for group_record in record.groups {
            let mut group = PhraseGroup::default();
            for position in group_record.entries {
                let entry = entries.get(position).ok_or_else(|| {
                    SnapshotError::InvalidFormat(format!(
                        "key '{}' references missing entry {position}",
                        record.key
                    ))
                })?;
                if entry.len() != group_record.length {
                    return Err(SnapshotError::InvalidFormat(format!(
                        "entry of length {} stored under length {} for key '{}'",
                        entry.len(),
                        group_record.length,
                        record.key
                    )));
                }
                group.push(Arc::clone(entry));
            }
            if groups.insert(group_record.length, group).is_some() {
                return Err(SnapshotError::InvalidFormat(format!(
                    "duplicate length {} for key '{}'",
                    group_record.length, record.key
                )));
            }
        }

        let phrases = PhrasesByLength::from_groups(groups).ok_or_else(|| {
            SnapshotError::InvalidFormat(format!("key '{}' has no entries", record.key))
        })?;
        if !index.insert_restored(record.key.clone(), phrases) {
            return Err(SnapshotError::InvalidFormat(format!("duplicate key '{}'", record.key)));
        }
    }

    Ok(Restored {
        index,
        schema: snapshot.schema,
        order_independent: snapshot.order_independent,
    })
}
