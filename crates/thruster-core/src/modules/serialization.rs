use crate::domain::{OutputField, OutputVector, Quantity};
use std::fs;
use std::path::Path;

pub const UNDEFINED_MARKER: &str = "undefined";

pub fn format_fixed_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$}",
        width = width,
        precision = precision
    )
}

pub fn format_quantity(quantity: Quantity, width: usize, precision: usize) -> String {
    match quantity {
        Quantity::Value(value) => format_fixed_f64(value, width, precision),
        Quantity::Undefined => format!("{UNDEFINED_MARKER:>width$}", width = width),
    }
}

/// One line per output field: label, value at the field's display precision, unit.
pub fn render_output_table(outputs: &OutputVector) -> String {
    let label_width = OutputField::ALL
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or(0);

    let mut rendered = String::new();
    for field in OutputField::ALL {
        let value = format_quantity(outputs.get(field), 16, field.display_precision());
        rendered.push_str(&format!(
            "{:<label_width$} {} {}\n",
            field.label(),
            value,
            field.unit(),
            label_width = label_width
        ));
    }
    rendered
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, normalize_text_artifact(content))
}

#[cfg(test)]
mod tests {
    use super::{
        format_fixed_f64, format_quantity, normalize_text_artifact, render_output_table,
        write_text_artifact,
    };
    use crate::domain::{OutputVector, Quantity};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fixed_width_float_formatting_is_deterministic() {
        let first = format_fixed_f64(1.23, 13, 5);
        let second = format_fixed_f64(1.23, 13, 5);

        assert_eq!(first, "      1.23000");
        assert_eq!(first, second);
    }

    #[test]
    fn undefined_quantities_render_as_marker() {
        assert_eq!(format_quantity(Quantity::Undefined, 10, 2), " undefined");
        assert_eq!(format_quantity(Quantity::Value(0.0), 6, 2), "  0.00");
    }

    #[test]
    fn output_table_uses_field_precision() {
        let outputs = OutputVector {
            specific_impulse: 2038.735_983_690_112,
            jet_power: 0.2,
            ion_current: 21.709_199_538_047_32,
            neutral_energy: f64::NAN,
            ..OutputVector::default()
        };
        let table = render_output_table(&outputs);
        assert_eq!(table.lines().count(), 16);
        assert!(table.contains("2038.74 s"));
        assert!(table.contains("0.2000 kW"));
        assert!(table.contains("21.709200 A"));
        let neutral_line = table
            .lines()
            .find(|line| line.starts_with("Neutral energy "))
            .expect("neutral energy line");
        assert!(neutral_line.contains("undefined"));
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn text_artifacts_create_parent_directories() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("reports/derive.json");

        write_text_artifact(&path, "{}").expect("write should succeed");
        assert_eq!(fs::read_to_string(&path).expect("readable"), "{}\n");
    }
}
