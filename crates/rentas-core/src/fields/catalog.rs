//! The fixed set of fields read from a settlement form.

/// How the text after a label becomes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Everything up to a double space, a newline or the end of text.
    Generic,
    /// Exactly `dd.dd.dddd` right after the label, nothing else.
    DateDdMmYyyy,
}

/// A named extraction rule: field name, label and value policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field_name: &'static str,
    pub label: &'static str,
    pub policy: ValuePolicy,
}

impl FieldSpec {
    const fn generic(field_name: &'static str, label: &'static str) -> Self {
        Self {
            field_name,
            label,
            policy: ValuePolicy::Generic,
        }
    }
}

/// Catalog in form order. Field names are the wire keys.
pub const CATALOG: [FieldSpec; 13] = [
    FieldSpec::generic("RADICADO", "RADICADO N°"),
    FieldSpec::generic("N_DOC", "N° DOC"),
    FieldSpec {
        field_name: "FECHA_LIMITE",
        label: "FECHA LÍMITE DE REGISTRO",
        policy: ValuePolicy::DateDdMmYyyy,
    },
    FieldSpec::generic("TOTAL_PAGAR", "TOTAL A PAGAR"),
    FieldSpec::generic("LUGAR_EXPEDICION", "LUGAR DE EXPEDICIÓN"),
    FieldSpec::generic("FECHA_LIQ", "FECHA LIQ"),
    FieldSpec::generic("OTORGADA_POR", "OTORGADA POR"),
    FieldSpec::generic("A_FAVOR_DE", "A FAVOR DE"),
    FieldSpec::generic("ORIGEN_DOC", "ORIGEN DOC"),
    FieldSpec::generic("CLASE", "CLASE"),
    FieldSpec::generic("MATR_INM", "MATR. INM"),
    FieldSpec::generic("VALOR_LETRAS", "VALOR EN LETRAS"),
    FieldSpec::generic("NOMBRE_LIQUIDADOR", "NOMBRE LIQUIDADOR"),
];

/// Look up a spec by field name.
pub fn field_spec(field_name: &str) -> Option<&'static FieldSpec> {
    CATALOG.iter().find(|spec| spec.field_name == field_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|s| s.field_name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_only_deadline_is_strict() {
        let strict: Vec<_> = CATALOG
            .iter()
            .filter(|s| s.policy == ValuePolicy::DateDdMmYyyy)
            .map(|s| s.field_name)
            .collect();
        assert_eq!(strict, vec!["FECHA_LIMITE"]);
        assert_eq!(field_spec("MATR_INM").map(|s| s.label), Some("MATR. INM"));
    }
}
