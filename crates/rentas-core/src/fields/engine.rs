//! Label-driven field extraction over a document's text.

use regex::Regex;
use tracing::{debug, trace};

use super::catalog::{FieldSpec, CATALOG};
use super::rules::{label_pattern, rule_for, ExtractionMatch, ValueRule};
use crate::models::record::{ExtractionResult, FieldValue};

/// Applies the field catalog to text.
///
/// Every field is evaluated against the full text on its own, so two labels
/// sharing a substring can both match it.
pub struct FieldEngine {
    fields: Vec<CompiledField>,
}

struct CompiledField {
    spec: &'static FieldSpec,
    label: Regex,
    rule: &'static dyn ValueRule,
}

impl CompiledField {
    fn extract(&self, text: &str) -> Option<ExtractionMatch> {
        let label = self.label.find(text)?;
        self.rule
            .capture(&text[label.end()..])
            .map(|m| m.offset(label.end()))
    }
}

impl FieldEngine {
    /// Compile the catalog.
    pub fn new() -> Self {
        let fields = CATALOG
            .iter()
            .map(|spec| CompiledField {
                spec,
                label: label_pattern(spec.label),
                rule: rule_for(spec.policy),
            })
            .collect();

        Self { fields }
    }

    /// Locate a single field's value, with its position in `text`.
    pub fn locate(&self, field_name: &str, text: &str) -> Option<ExtractionMatch> {
        self.fields
            .iter()
            .find(|f| f.spec.field_name == field_name)
            .and_then(|f| f.extract(text))
    }

    /// Extract every catalog field. Missing fields become `NotFound`.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let result = ExtractionResult::from_fields(self.fields.iter().map(|field| {
            let value = match field.extract(text) {
                Some(m) => {
                    trace!("{} = {:?} at {}..{}", field.spec.field_name, m.value, m.start, m.end);
                    FieldValue::from_capture(&m.value)
                }
                None => {
                    trace!("{} not found", field.spec.field_name);
                    FieldValue::NotFound
                }
            };
            (field.spec.field_name.to_string(), value)
        }));

        debug!(
            "Extracted {}/{} fields from {} characters of text",
            result.found_count(),
            self.fields.len(),
            text.len()
        );

        result
    }
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::catalog::ValuePolicy;
    use crate::models::record::NOT_FOUND;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
GOBERNACION DE CUNDINAMARCA          SECRETARIA DE HACIENDA
RADICADO N°: 2024001234    N° DOC: 4567
FECHA LÍMITE DE REGISTRO 05.08.2024     TOTAL A PAGAR: $ 1.250.000
LUGAR DE EXPEDICIÓN: BOGOTA D.C.
FECHA LIQ: 22.07.2024
OTORGADA POR: JUAN PEREZ GOMEZ
A FAVOR DE: MARIA RODRIGUEZ
ORIGEN DOC: NOTARIA 15 DE BOGOTA
CLASE: COMPRAVENTA
MATR. INM: 50C-1234567
VALOR EN LETRAS: UN MILLON DOSCIENTOS CINCUENTA MIL PESOS
NOMBRE LIQUIDADOR: ANA TORRES
";

    #[test]
    fn test_parse_full_form() {
        let result = FieldEngine::new().parse(SAMPLE);

        let values: Vec<(&str, &str)> = result.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("RADICADO", "2024001234"),
                ("N_DOC", "4567"),
                ("FECHA_LIMITE", "05.08.2024"),
                ("TOTAL_PAGAR", "$ 1.250.000"),
                ("LUGAR_EXPEDICION", "BOGOTA D.C."),
                ("FECHA_LIQ", "22.07.2024"),
                ("OTORGADA_POR", "JUAN PEREZ GOMEZ"),
                ("A_FAVOR_DE", "MARIA RODRIGUEZ"),
                ("ORIGEN_DOC", "NOTARIA 15 DE BOGOTA"),
                ("CLASE", "COMPRAVENTA"),
                ("MATR_INM", "50C-1234567"),
                ("VALOR_LETRAS", "UN MILLON DOSCIENTOS CINCUENTA MIL PESOS"),
                ("NOMBRE_LIQUIDADOR", "ANA TORRES"),
            ]
        );
    }

    #[test]
    fn test_every_field_present_for_any_text() {
        let engine = FieldEngine::new();
        for text in ["", "   ", "sin etiquetas", SAMPLE, "CLASE"] {
            let result = engine.parse(text);
            assert!(result.is_complete(), "incomplete result for {text:?}");
            assert_eq!(result.len(), CATALOG.len());
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let engine = FieldEngine::new();
        assert_eq!(engine.parse(SAMPLE), engine.parse(SAMPLE));
        assert_eq!(FieldEngine::new().parse(SAMPLE), engine.parse(SAMPLE));
    }

    #[test]
    fn test_radicado_with_trailing_spaces() {
        let result = FieldEngine::new().parse("RADICADO N°: 12345    \n");
        assert_eq!(result.value("RADICADO"), "12345");
    }

    #[test]
    fn test_deadline_requires_dotted_date() {
        let engine = FieldEngine::new();

        let result = engine.parse("FECHA LÍMITE DE REGISTRO 05.08.2024");
        assert_eq!(result.value("FECHA_LIMITE"), "05.08.2024");

        let text = "FECHA LÍMITE DE REGISTRO pendiente";
        let result = engine.parse(text);
        assert_eq!(result.value("FECHA_LIMITE"), NOT_FOUND);

        // The generic rule would have accepted it.
        let generic = rule_for(ValuePolicy::Generic);
        let after = &text["FECHA LÍMITE DE REGISTRO".len()..];
        assert_eq!(generic.capture(after).unwrap().value, "pendiente");
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let result = FieldEngine::new().parse("Clase: Hipoteca\nfecha límite de registro: 01.09.2024");
        assert_eq!(result.value("CLASE"), "Hipoteca");
        assert_eq!(result.value("FECHA_LIMITE"), "01.09.2024");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let result = FieldEngine::new().parse("CLASE:\nCLASE: VENTA");
        // The separator after the first label swallows the newline.
        assert_eq!(result.value("CLASE"), "CLASE: VENTA");
    }

    #[test]
    fn test_overlapping_labels_share_text() {
        // "N° DOC" sits inside "RADICADO N° DOC"; both specs read the same run.
        let result = FieldEngine::new().parse("RADICADO N° DOC 778899   ");
        assert_eq!(result.value("RADICADO"), "DOC 778899");
        assert_eq!(result.value("N_DOC"), "778899");
    }

    #[test]
    fn test_label_at_end_of_text() {
        let result = FieldEngine::new().parse("TOTAL A PAGAR:   ");
        assert_eq!(result.get("TOTAL_PAGAR"), Some(&FieldValue::NotFound));
    }

    #[test]
    fn test_locate_reports_position() {
        let text = "xx CLASE: VENTA  yy";
        let m = FieldEngine::new().locate("CLASE", text).unwrap();
        assert_eq!(&text[m.start..m.end], "VENTA");
        assert!(FieldEngine::new().locate("UNKNOWN", text).is_none());
    }
}
