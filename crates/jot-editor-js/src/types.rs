//! Types exposed to JavaScript via wasm-bindgen.

use jot_editor_browser::{Side, Widget};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

/// A marker widget as the host turns it into a widget decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsWidget {
    pub pos: usize,
    pub text: String,
    /// Full class attribute, `md-marker` included.
    pub class_name: String,
    /// Widget bias: -1 before the position, 1 after it.
    pub side: i8,
}

impl From<&Widget> for JsWidget {
    fn from(widget: &Widget) -> Self {
        Self {
            pos: widget.pos,
            text: widget.text.to_string(),
            class_name: widget.dom_class().to_string(),
            side: widget.side.bias(),
        }
    }
}

impl JsWidget {
    pub fn to_widget(&self) -> Widget {
        let side = if self.side < 0 { Side::Before } else { Side::After };
        let class = self
            .class_name
            .strip_prefix("md-marker ")
            .unwrap_or(&self.class_name);
        Widget::new(self.pos, self.text.as_str(), class, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_round_trip_through_js_shape() {
        let widget = Widget::new(9, "*", "md-close em", Side::After);
        let js = JsWidget::from(&widget);
        assert_eq!(js.class_name, "md-marker md-close em");
        assert_eq!(js.side, 1);
        assert_eq!(js.to_widget(), widget);
    }
}
