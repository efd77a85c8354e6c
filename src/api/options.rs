use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::ChartDrawer;

use super::{BaseChart, SizeSpec};

/// Options whose array values are spread over the setter's parameters.
/// Any other option receives its value as a single argument.
pub const VARIADIC_OPTIONS: &[&str] = &["transition", "minSize"];

fn invalid(name: &str, reason: impl Into<String>) -> ChartError {
    ChartError::InvalidOption {
        name: name.to_owned(),
        reason: reason.into(),
    }
}

fn required<'a>(name: &str, args: &[&'a Value], index: usize) -> ChartResult<&'a Value> {
    args.get(index)
        .copied()
        .ok_or_else(|| invalid(name, format!("missing argument {}", index + 1)))
}

fn number(name: &str, value: &Value) -> ChartResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(name, format!("expected a number, got {value}")))
}

fn millis(name: &str, value: &Value) -> ChartResult<u64> {
    if let Some(millis) = value.as_u64() {
        return Ok(millis);
    }
    match value.as_f64() {
        Some(millis) if millis >= 0.0 && millis.is_finite() => Ok(millis.round() as u64),
        _ => Err(invalid(
            name,
            format!("expected a non-negative duration in ms, got {value}"),
        )),
    }
}

fn flag(name: &str, value: &Value) -> ChartResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(name, format!("expected a boolean, got {value}")))
}

fn text<'a>(name: &str, value: &'a Value) -> ChartResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| invalid(name, format!("expected a string, got {value}")))
}

/// `null` and `0` restore the default calculator.
fn size_spec(name: &str, value: &Value) -> ChartResult<SizeSpec> {
    if value.is_null() {
        return Ok(SizeSpec::Default);
    }
    let size = number(name, value)?;
    if size == 0.0 {
        Ok(SizeSpec::Default)
    } else {
        Ok(SizeSpec::Fixed(size))
    }
}

impl<D: ChartDrawer> BaseChart<D> {
    /// Bulk setter: every entry is dispatched to the setter of the same
    /// name.
    ///
    /// Unknown names are skipped. The first value of the wrong type aborts
    /// with [`ChartError::InvalidOption`]; options before it stay applied.
    pub fn options(&mut self, options: &Map<String, Value>) -> ChartResult<()> {
        for (name, value) in options {
            let args: Vec<&Value> = match value {
                Value::Array(items) if VARIADIC_OPTIONS.contains(&name.as_str()) => {
                    items.iter().collect()
                }
                single => vec![single],
            };
            self.apply_option(name, &args)?;
        }
        Ok(())
    }

    fn apply_option(&mut self, name: &str, args: &[&Value]) -> ChartResult<()> {
        let first = required(name, args, 0)?;
        match name {
            "width" => self.set_width(size_spec(name, first)?),
            "height" => self.set_height(size_spec(name, first)?),
            "minWidth" => self.set_min_width(number(name, first)?),
            "minHeight" => self.set_min_height(number(name, first)?),
            "minSize" => {
                self.set_min_width(number(name, first)?);
                if let Some(height) = args.get(1) {
                    self.set_min_height(number(name, height)?);
                }
            }
            "transitionDuration" => self.set_transition_duration_ms(millis(name, first)?),
            "transitionDelay" => self.set_transition_delay_ms(millis(name, first)?),
            "transition" => {
                self.set_transition_duration_ms(millis(name, first)?);
                if let Some(delay) = args.get(1) {
                    self.set_transition_delay_ms(millis(name, delay)?);
                }
            }
            "renderLabel" => self.set_render_label(flag(name, first)?),
            "renderTitle" => self.set_render_title(flag(name, first)?),
            "controlsUseVisibility" => self.set_controls_use_visibility(flag(name, first)?),
            "chartGroup" => self.assign_chart_group(text(name, first)?),
            _ => {
                debug!(chart_id = %self.id, option = name, "not a valid option setter name");
            }
        }
        Ok(())
    }
}
