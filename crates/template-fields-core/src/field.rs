use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::FieldDefaults;
use crate::coords::SurfacePoint;
use crate::error::EditError;

/// Whether a field is filled in by the signer or carries a preset value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Editable,
    Prefilled,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Editable => "editable",
            FieldKind::Prefilled => "prefilled",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "editable" => Ok(FieldKind::Editable),
            "prefilled" => Ok(FieldKind::Prefilled),
            other => Err(EditError::UnknownKind(other.to_string())),
        }
    }
}

/// The document a field collection belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub file_url: String,
}

impl Template {
    pub fn new(id: impl Into<String>, file_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_url: file_url.into(),
        }
    }
}

/// A positioned rectangle on one page of a template.
///
/// Geometry is in display pixels relative to the document surface's top-left
/// corner. It is not checked against the page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub template_id: String,
    pub name: String,
    pub kind: FieldKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page: u32,
}

impl Field {
    /// Create a field at a surface point with the configured defaults and a
    /// fresh client-side id
    pub fn at_point(
        template_id: &str,
        point: SurfacePoint,
        page: u32,
        defaults: &FieldDefaults,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            template_id: template_id.to_string(),
            name: defaults.default_name.clone(),
            kind: FieldKind::Editable,
            x: point.x,
            y: point.y,
            width: defaults.default_width,
            height: defaults.default_height,
            page,
        }
    }

    /// Overwrite the one attribute named by `edit`
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Kind(kind) => self.kind = kind,
            FieldEdit::X(x) => self.x = x,
            FieldEdit::Y(y) => self.y = y,
            FieldEdit::Width(width) => self.width = width,
            FieldEdit::Height(height) => self.height = height,
            FieldEdit::Page(page) => self.page = page,
        }
    }
}

/// The inspector's editable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAttribute {
    Name,
    Kind,
    X,
    Y,
    Width,
    Height,
    Page,
}

impl FieldAttribute {
    pub const ALL: [FieldAttribute; 7] = [
        FieldAttribute::Name,
        FieldAttribute::Kind,
        FieldAttribute::X,
        FieldAttribute::Y,
        FieldAttribute::Width,
        FieldAttribute::Height,
        FieldAttribute::Page,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldAttribute::Name => "name",
            FieldAttribute::Kind => "kind",
            FieldAttribute::X => "x",
            FieldAttribute::Y => "y",
            FieldAttribute::Width => "width",
            FieldAttribute::Height => "height",
            FieldAttribute::Page => "page",
        }
    }

    /// Human-readable label shown next to the inspector input
    pub fn label(&self) -> &'static str {
        match self {
            FieldAttribute::Name => "Name",
            FieldAttribute::Kind => "Type",
            FieldAttribute::X => "X",
            FieldAttribute::Y => "Y",
            FieldAttribute::Width => "Width",
            FieldAttribute::Height => "Height",
            FieldAttribute::Page => "Page",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldAttribute::Name | FieldAttribute::Kind)
    }

    /// Current value of this attribute on `field`, formatted for a text input
    pub fn read(&self, field: &Field) -> String {
        match self {
            FieldAttribute::Name => field.name.clone(),
            FieldAttribute::Kind => field.kind.to_string(),
            FieldAttribute::X => field.x.to_string(),
            FieldAttribute::Y => field.y.to_string(),
            FieldAttribute::Width => field.width.to_string(),
            FieldAttribute::Height => field.height.to_string(),
            FieldAttribute::Page => field.page.to_string(),
        }
    }
}

impl FromStr for FieldAttribute {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldAttribute::ALL
            .into_iter()
            .find(|attr| attr.as_str() == s)
            .ok_or_else(|| EditError::UnknownAttribute(s.to_string()))
    }
}

/// A single-attribute change coming from the inspector
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Kind(FieldKind),
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    Page(u32),
}

impl FieldEdit {
    /// Turn raw input text into a typed edit.
    ///
    /// Numbers must parse as finite values; negative or off-page values are
    /// kept as entered. Pages must be whole numbers of at least 1.
    pub fn parse(attribute: FieldAttribute, raw: &str) -> Result<Self, EditError> {
        match attribute {
            FieldAttribute::Name => Ok(FieldEdit::Name(raw.to_string())),
            FieldAttribute::Kind => raw.parse().map(FieldEdit::Kind),
            FieldAttribute::X => parse_number(raw).map(FieldEdit::X),
            FieldAttribute::Y => parse_number(raw).map(FieldEdit::Y),
            FieldAttribute::Width => parse_number(raw).map(FieldEdit::Width),
            FieldAttribute::Height => parse_number(raw).map(FieldEdit::Height),
            FieldAttribute::Page => parse_page(raw).map(FieldEdit::Page),
        }
    }

    pub fn attribute(&self) -> FieldAttribute {
        match self {
            FieldEdit::Name(_) => FieldAttribute::Name,
            FieldEdit::Kind(_) => FieldAttribute::Kind,
            FieldEdit::X(_) => FieldAttribute::X,
            FieldEdit::Y(_) => FieldAttribute::Y,
            FieldEdit::Width(_) => FieldAttribute::Width,
            FieldEdit::Height(_) => FieldAttribute::Height,
            FieldEdit::Page(_) => FieldAttribute::Page,
        }
    }
}

fn parse_number(raw: &str) -> Result<f64, EditError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EditError::InvalidNumber(raw.to_string()))
}

fn parse_page(raw: &str) -> Result<u32, EditError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| EditError::InvalidPage(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Field {
        Field::at_point(
            "tpl-1",
            SurfacePoint::new(10.0, 20.0),
            1,
            &FieldDefaults::default(),
        )
    }

    #[test]
    fn test_field_at_point_uses_defaults() {
        let field = sample();
        assert_eq!(field.template_id, "tpl-1");
        assert_eq!(field.name, "New Field");
        assert_eq!(field.kind, FieldKind::Editable);
        assert_eq!((field.x, field.y), (10.0, 20.0));
        assert_eq!((field.width, field.height), (100.0, 20.0));
        assert_eq!(field.page, 1);
        assert!(!field.id.is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&FieldKind::Prefilled).unwrap();
        assert_eq!(json, "\"prefilled\"");
        let kind: FieldKind = serde_json::from_str("\"editable\"").unwrap();
        assert_eq!(kind, FieldKind::Editable);
    }

    #[test]
    fn test_kind_rejects_other_tags() {
        assert!(serde_json::from_str::<FieldKind>("\"signature\"").is_err());
        assert_eq!(
            "Editable".parse::<FieldKind>(),
            Err(EditError::UnknownKind("Editable".to_string()))
        );
    }

    #[test]
    fn test_parse_numeric_edit() {
        assert_eq!(
            FieldEdit::parse(FieldAttribute::X, " 42.5 "),
            Ok(FieldEdit::X(42.5))
        );
        // Out-of-page values are stored as entered
        assert_eq!(
            FieldEdit::parse(FieldAttribute::Width, "-3"),
            Ok(FieldEdit::Width(-3.0))
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            FieldEdit::parse(FieldAttribute::Y, ""),
            Err(EditError::InvalidNumber(_))
        ));
        assert!(matches!(
            FieldEdit::parse(FieldAttribute::Height, "abc"),
            Err(EditError::InvalidNumber(_))
        ));
        assert!(matches!(
            FieldEdit::parse(FieldAttribute::X, "NaN"),
            Err(EditError::InvalidNumber(_))
        ));
        assert!(matches!(
            FieldEdit::parse(FieldAttribute::X, "1e400"),
            Err(EditError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_page_must_be_positive_integer() {
        assert_eq!(
            FieldEdit::parse(FieldAttribute::Page, "3"),
            Ok(FieldEdit::Page(3))
        );
        for bad in ["0", "-1", "1.5", "two"] {
            assert!(
                matches!(
                    FieldEdit::parse(FieldAttribute::Page, bad),
                    Err(EditError::InvalidPage(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_apply_changes_one_attribute() {
        let mut field = sample();
        let before = field.clone();
        field.apply(FieldEdit::Name("Tenant".into()));
        assert_eq!(field.name, "Tenant");
        assert_eq!(Field { name: before.name.clone(), ..field.clone() }, before);
    }

    #[test]
    fn test_attribute_names_round_trip() {
        for attr in FieldAttribute::ALL {
            assert_eq!(attr.as_str().parse::<FieldAttribute>(), Ok(attr));
        }
        assert!("colour".parse::<FieldAttribute>().is_err());
    }

    #[test]
    fn test_edit_reports_its_attribute() {
        assert_eq!(FieldEdit::Page(2).attribute(), FieldAttribute::Page);
        assert_eq!(
            FieldEdit::Kind(FieldKind::Prefilled).attribute(),
            FieldAttribute::Kind
        );
    }
}
