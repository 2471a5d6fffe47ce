//! CSVW JSON manifest (`cldf-metadata.json`).
//!
//! Only the keys we write or read are modelled; anything else in a manifest
//! produced by other tooling is ignored on read.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::{ColumnSpec, TableRecord};
use crate::term_url;

pub const WORDLIST_MODULE: &str = "http://cldf.clld.org/v1.0/terms.rdf#Wordlist";
pub const METADATA_FILE: &str = "cldf-metadata.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableGroup {
    #[serde(rename = "@context", default = "default_context")]
    pub context: Value,
    #[serde(rename = "dc:conformsTo", default, skip_serializing_if = "Option::is_none")]
    pub conforms_to: Option<String>,
    #[serde(rename = "rdf:ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "dc:identifier", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(rename = "dc:title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "dc:license", default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(
        rename = "dc:bibliographicCitation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub citation: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

fn default_context() -> Value {
    json!(["http://www.w3.org/ns/csvw", {"@language": "en"}])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub url: String,
    #[serde(rename = "dc:conformsTo", default, skip_serializing_if = "Option::is_none")]
    pub conforms_to: Option<String>,
    #[serde(rename = "tableSchema")]
    pub table_schema: TableSchema,
}

impl Table {
    /// Component name this table conforms to (`FormTable`), if any.
    pub fn component(&self) -> Option<&str> {
        self.conforms_to
            .as_deref()
            .and_then(|url| url.rsplit_once('#').map(|(_, c)| c))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub columns: Vec<Column>,
    /// String or list of strings in CSVW.
    #[serde(rename = "primaryKey", default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Value>,
    #[serde(rename = "foreignKeys", default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "propertyUrl", default, skip_serializing_if = "Option::is_none")]
    pub property_url: Option<String>,
    /// String or datatype object in CSVW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

impl Column {
    /// Property term of the column (`languageReference`), if any.
    pub fn term(&self) -> Option<&str> {
        self.property_url
            .as_deref()
            .and_then(|url| url.rsplit_once('#').map(|(_, t)| t))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    #[serde(rename = "columnReference")]
    pub column_reference: String,
    pub reference: ForeignKeyReference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    pub resource: String,
    #[serde(rename = "columnReference")]
    pub column_reference: String,
}

impl From<&ColumnSpec> for Column {
    fn from(spec: &ColumnSpec) -> Self {
        Column {
            name: spec.name.to_string(),
            property_url: spec.property.map(term_url),
            datatype: Some(Value::String(spec.datatype.to_string())),
            separator: spec.separator.map(str::to_string),
        }
    }
}

/// Manifest entry for a record type, with foreign keys onto `references`
/// (`(column, target table url)` pairs).
pub fn table_for<R: TableRecord>(references: &[(&str, &str)]) -> Table {
    Table {
        url: R::URL.to_string(),
        conforms_to: Some(term_url(R::COMPONENT)),
        table_schema: TableSchema {
            columns: R::columns().iter().map(Column::from).collect(),
            primary_key: Some(json!(["ID"])),
            foreign_keys: references
                .iter()
                .map(|(column, resource)| ForeignKey {
                    column_reference: column.to_string(),
                    reference: ForeignKeyReference {
                        resource: resource.to_string(),
                        column_reference: "ID".to_string(),
                    },
                })
                .collect(),
        },
    }
}
