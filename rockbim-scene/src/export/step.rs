//! Minimal ISO 10303-21 (STEP physical file) writer.
//!
//! Entities are appended in creation order and numbered from `#1`; the
//! numbering is therefore a pure function of the order in which the caller
//! adds them.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

/// Reference to an entity instance, `#n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    /// Unset optional attribute, `$`.
    Null,
    /// Attribute derived in a subtype, `*`.
    Derived,
    Ref(EntityId),
    Integer(i64),
    Real(f64),
    Bool(bool),
    String(String),
    /// Enumeration literal, written as `.NAME.`.
    Enum(&'static str),
    List(Vec<StepValue>),
    /// Typed select value such as `IFCREAL(1.5)`.
    Typed(&'static str, Box<StepValue>),
}

impl StepValue {
    pub fn string(s: impl Into<String>) -> Self {
        StepValue::String(s.into())
    }

    pub fn refs(ids: impl IntoIterator<Item = EntityId>) -> Self {
        StepValue::List(ids.into_iter().map(StepValue::Ref).collect())
    }

    pub fn reals(values: impl IntoIterator<Item = f64>) -> Self {
        StepValue::List(values.into_iter().map(StepValue::Real).collect())
    }

    pub fn typed(keyword: &'static str, value: StepValue) -> Self {
        StepValue::Typed(keyword, Box::new(value))
    }
}

impl From<EntityId> for StepValue {
    fn from(id: EntityId) -> Self {
        StepValue::Ref(id)
    }
}

impl From<f64> for StepValue {
    fn from(value: f64) -> Self {
        StepValue::Real(value)
    }
}

impl From<&str> for StepValue {
    fn from(value: &str) -> Self {
        StepValue::String(value.to_string())
    }
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepValue::Null => f.write_char('$'),
            StepValue::Derived => f.write_char('*'),
            StepValue::Ref(id) => write!(f, "{id}"),
            StepValue::Integer(i) => write!(f, "{i}"),
            StepValue::Real(r) => write_real(f, *r),
            StepValue::Bool(b) => f.write_str(if *b { ".T." } else { ".F." }),
            StepValue::String(s) => write_string(f, s),
            StepValue::Enum(e) => write!(f, ".{e}."),
            StepValue::List(items) => {
                f.write_char('(')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(')')
            }
            StepValue::Typed(keyword, value) => write!(f, "{keyword}({value})"),
        }
    }
}

/// Reals always carry a decimal point; non-finite values have no STEP form
/// and are written as zero.
fn write_real(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if !value.is_finite() {
        return f.write_str("0.");
    }
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => write!(f, "{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => write!(f, "{mantissa}.E{exponent}"),
        None if text.contains('.') => f.write_str(&text),
        None => write!(f, "{text}."),
    }
}

/// Quote a string; non-ASCII characters use the `\X2\` UTF-16 escape.
fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("''")?,
            '\\' => f.write_str("\\\\")?,
            ' '..='~' => f.write_char(c)?,
            _ => {
                f.write_str("\\X2\\")?;
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(f, "{:04X}", unit)?;
                }
                f.write_str("\\X0\\")?;
            }
        }
    }
    f.write_char('\'')
}

/// Values for the `FILE_NAME` header entry.
#[derive(Debug, Clone, Default)]
pub struct StepHeader {
    pub description: String,
    pub file_name: String,
    pub time_stamp: String,
    pub originating_system: String,
    pub schema: String,
}

/// Accumulates entity instances of the DATA section.
#[derive(Debug, Default)]
pub struct StepWriter {
    lines: Vec<String>,
}

impl StepWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity instance and return its reference.
    pub fn add(&mut self, keyword: &str, attributes: Vec<StepValue>) -> EntityId {
        let id = EntityId(self.lines.len() as u64 + 1);
        let mut line = format!("{id}={keyword}(");
        for (i, attribute) in attributes.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            // Writing into a String cannot fail.
            let _ = write!(line, "{attribute}");
        }
        line.push_str(");");
        self.lines.push(line);
        id
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write the complete exchange structure.
    pub fn write_to<W: Write>(&self, header: &StepHeader, mut out: W) -> io::Result<()> {
        writeln!(out, "ISO-10303-21;")?;
        writeln!(out, "HEADER;")?;
        writeln!(
            out,
            "FILE_DESCRIPTION(({}),'2;1');",
            StepValue::string(header.description.as_str())
        )?;
        writeln!(
            out,
            "FILE_NAME({},{},(''),(''),{},{},'');",
            StepValue::string(header.file_name.as_str()),
            StepValue::string(header.time_stamp.as_str()),
            StepValue::string(header.originating_system.as_str()),
            StepValue::string(header.originating_system.as_str()),
        )?;
        writeln!(
            out,
            "FILE_SCHEMA(({}));",
            StepValue::string(header.schema.as_str())
        )?;
        writeln!(out, "ENDSEC;")?;
        writeln!(out, "DATA;")?;
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "ENDSEC;")?;
        writeln!(out, "END-ISO-10303-21;")?;
        out.flush()
    }
}
