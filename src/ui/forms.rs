use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Participant;
use crate::partition::DistributionMode;

/// Single-line input used to add people to the roster. The form stays open
/// after a successful add so several names can be typed in a row.
#[derive(Default, Clone)]
pub(crate) struct NameForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl NameForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn reset(&mut self) {
        self.name.clear();
        self.error = None;
    }

    pub(crate) fn value_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Score editor for one participant. Any text is accepted here; coercion to
/// an integer happens in the roster store.
#[derive(Clone)]
pub(crate) struct ScoreForm {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl ScoreForm {
    pub(crate) fn from_participant(participant: &Participant) -> Self {
        Self {
            name: participant.name.clone(),
            value: participant.score.to_string(),
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Which input of the distribute form has focus.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum DistributeField {
    #[default]
    Mode,
    Quantity,
}

#[derive(Default, Clone)]
pub(crate) struct DistributeForm {
    pub(crate) mode: DistributionMode,
    pub(crate) quantity: String,
    pub(crate) active: DistributeField,
    pub(crate) error: Option<String>,
}

impl DistributeForm {
    /// Open with the quantity field focused, since the mode is usually kept.
    pub(crate) fn new(mode: DistributionMode) -> Self {
        Self {
            mode,
            active: DistributeField::Quantity,
            ..Self::default()
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            DistributeField::Mode => DistributeField::Quantity,
            DistributeField::Quantity => DistributeField::Mode,
        };
    }

    pub(crate) fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    /// Quantity only takes digits; Space on the mode field flips the mode.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            DistributeField::Quantity => {
                if ch.is_ascii_digit() {
                    self.quantity.push(ch);
                    true
                } else {
                    false
                }
            }
            DistributeField::Mode => {
                if ch == ' ' {
                    self.toggle_mode();
                    true
                } else {
                    false
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.active == DistributeField::Quantity {
            self.quantity.pop();
        }
    }

    pub(crate) fn parse_quantity(&self) -> Result<usize> {
        let raw = self.quantity.trim();
        if raw.is_empty() {
            return Err(anyhow!("Enter a quantity."));
        }
        raw.parse::<usize>()
            .map_err(|_| anyhow!("Quantity must be a whole number."))
    }

    pub(crate) fn build_line(&self, field: DistributeField) -> Line<'static> {
        let is_active = self.active == field;
        let (label, value) = match field {
            DistributeField::Mode => ("Mode", format!("< {} >", self.mode)),
            DistributeField::Quantity => (
                "Quantity",
                if self.quantity.is_empty() {
                    "<required>".to_string()
                } else {
                    self.quantity.clone()
                },
            ),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field == DistributeField::Quantity && self.quantity.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![Span::raw(format!("{label}: ")), Span::styled(value, style)])
    }
}

/// Pending removal awaiting a yes/no answer.
#[derive(Clone)]
pub(crate) struct ConfirmRemove {
    pub(crate) name: String,
    pub(crate) on_teams: bool,
}

/// Blocking message the user has to dismiss.
#[derive(Clone)]
pub(crate) struct Notice {
    pub(crate) title: &'static str,
    pub(crate) message: String,
}

impl Notice {
    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self {
            title: "Heads up",
            message: message.into(),
        }
    }

    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self {
            title: "Done",
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_only_accepts_digits() {
        let mut form = DistributeForm::new(DistributionMode::TeamCount);
        assert!(form.push_char('1'));
        assert!(!form.push_char('x'));
        assert!(form.push_char('2'));
        assert_eq!(form.parse_quantity().unwrap(), 12);
        form.backspace();
        form.backspace();
        assert!(form.parse_quantity().is_err());
    }

    #[test]
    fn oversized_quantity_reports_form_message() {
        let mut form = DistributeForm::new(DistributionMode::TeamCount);
        for _ in 0..40 {
            form.push_char('9');
        }
        let err = form.parse_quantity().unwrap_err();
        assert_eq!(
            crate::ui::helpers::surface_error(&err),
            "Quantity must be a whole number."
        );
    }

    #[test]
    fn space_on_mode_field_flips_mode() {
        let mut form = DistributeForm::new(DistributionMode::TeamCount);
        form.toggle_field();
        assert!(form.push_char(' '));
        assert_eq!(form.mode, DistributionMode::TeamSize);
        assert!(!form.push_char('7'));
        assert!(form.quantity.is_empty());
    }

    #[test]
    fn name_form_rejects_control_chars() {
        let mut form = NameForm::default();
        assert!(form.push_char('A'));
        assert!(!form.push_char('\n'));
        assert_eq!(form.name, "A");
        form.reset();
        assert_eq!(form.value_len(), 0);
    }
}
