use std::path::Path;

use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::mapper::map_row;
use crate::profile::Profile;
use crate::serializer::Serializer;
use crate::sqlite::{BackupReader, TableData};
use crate::tree::{append_field, Document};

/// Run the full pipeline for one profile and return the rendered document.
///
/// Nothing is written anywhere; the caller gets either the complete output
/// or an error.
pub fn export(db_file: &Path, profile: &Profile) -> Result<Vec<u8>> {
    let data = {
        let reader = BackupReader::open(db_file)?;
        if !reader.table_exists(&profile.table)? {
            return Err(ExportError::SchemaMismatch {
                table: profile.table.clone(),
            });
        }
        reader.fetch_all(&profile.table)?
    };
    if data.rows.is_empty() {
        return Err(ExportError::EmptyResult {
            what: profile.root_tag.clone(),
        });
    }
    info!(
        table = %profile.table,
        rows = data.rows.len(),
        columns = data.columns.len(),
        "loaded backup table"
    );

    let doc = build_document(&data, profile)?;
    Serializer::new(profile.encoding, profile.on_unencodable)
        .trimmed(profile.trim_output)
        .serialize(&doc)
}

/// Map every row through the profile's presence and conversion rules and
/// assemble the document tree.
pub fn build_document(data: &TableData, profile: &Profile) -> Result<Document> {
    let mut doc = Document::new_root(profile.root_tag.as_str());
    for (index, row) in data.rows.iter().enumerate() {
        let fields = map_row(&data.columns, row, profile.presence, profile.conversion)?;
        let record = doc.append_record(&profile.record_tag, index);
        for (name, text) in fields {
            append_field(record, &name, text);
        }
    }
    debug!(records = doc.records().len(), "built document");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::Value;

    #[test]
    fn one_record_per_row_with_sequential_ids() {
        let data = TableData {
            columns: vec!["GivenName".to_string(), "LastName".to_string()],
            rows: vec![
                vec![Value::Text("Aaron".into()), Value::Null],
                vec![Value::Null, Value::Null],
                vec![Value::Text("Cyd".into()), Value::Text("Cole".into())],
            ],
        };
        let doc = build_document(&data, &Profile::contacts()).unwrap();
        let records = doc.records();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.tag, "contact");
            assert_eq!(record.attributes, vec![("id".to_string(), i.to_string())]);
        }
        assert_eq!(records[0].children.len(), 1);
        assert!(records[1].children.is_empty());
        assert_eq!(records[2].children[1].tag, "LastName");
    }
}
