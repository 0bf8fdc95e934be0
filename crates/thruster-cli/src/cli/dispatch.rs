//! Turns command-line overrides into edits on an input vector, the way the
//! interactive shell turns field edits into recomputes.

use thruster_core::{
    EditedField, GasSpec, InputEdit, InputField, InputVector, coerce_numeric,
};

/// Raw text for each input field, as typed.
#[derive(Debug, Clone, Default)]
pub(super) struct InputOverrides {
    pub(super) gas: Option<String>,
    pub(super) values: Vec<(InputField, String)>,
}

impl InputOverrides {
    pub(super) fn push(&mut self, field: InputField, raw: Option<String>) {
        if let Some(raw) = raw {
            self.values.push((field, raw));
        }
    }
}

pub(super) fn apply_overrides(base: InputVector, overrides: &InputOverrides) -> InputVector {
    let inputs = match &overrides.gas {
        Some(gas) => InputVector {
            selected_gas: gas.trim().to_string(),
            ..base
        },
        None => base,
    };

    overrides
        .values
        .iter()
        .fold(inputs, |inputs, (field, raw)| {
            inputs.with_value(*field, coerce_numeric(raw))
        })
}

pub(super) const fn input_field_for(edited: EditedField) -> InputField {
    match edited {
        EditedField::Flow => InputField::GasFlow,
        EditedField::Current => InputField::EquivalentCurrent,
    }
}

/// Re-applies the edited linked field so its partner is recomputed from it.
pub(super) fn reconcile_edited(
    inputs: InputVector,
    edited: Option<EditedField>,
    gas: &GasSpec,
) -> InputVector {
    match edited {
        Some(edited) => {
            let field = input_field_for(edited);
            let value = inputs.get(field);
            inputs.with_edit(InputEdit::Value { field, value }, gas)
        }
        None => inputs,
    }
}

#[cfg(test)]
mod tests {
    use super::{InputOverrides, apply_overrides, reconcile_edited};
    use thruster_core::{BuiltinGas, EditedField, InputField, InputVector};

    #[test]
    fn overrides_coerce_raw_text() {
        let mut overrides = InputOverrides {
            gas: Some(" argon ".to_string()),
            ..InputOverrides::default()
        };
        overrides.push(InputField::Thrust, Some("12,5".to_string()));
        overrides.push(InputField::PowerHfg, Some("n/a".to_string()));
        overrides.push(InputField::GasUsage, None);

        let base = InputVector::default().with_value(InputField::GasUsage, 80.0);
        let inputs = apply_overrides(base, &overrides);
        assert_eq!(inputs.selected_gas, "argon");
        assert_eq!(inputs.thrust, 12.5);
        assert_eq!(inputs.power_hfg, 0.0);
        assert_eq!(inputs.gas_usage, 80.0);
    }

    #[test]
    fn edited_current_overwrites_stale_flow() {
        let neon = BuiltinGas::Neon.spec();
        let inputs = InputVector::new("neon")
            .with_value(InputField::GasFlow, 99.0)
            .with_value(InputField::EquivalentCurrent, 4.824_266_564_010_515);

        let reconciled = reconcile_edited(inputs.clone(), Some(EditedField::Current), &neon);
        assert!((reconciled.gas_flow - 1.0).abs() < 1.0e-9);
        assert_eq!(reconciled.equivalent_current, inputs.equivalent_current);

        let untouched = reconcile_edited(inputs.clone(), None, &neon);
        assert_eq!(untouched, inputs);
    }
}
