//! Adapter from a JavaScript span callback to a [`SpanResolver`].

use js_sys::Function;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::JsValue;

use crate::types::{ColumnDefinition, RawSpan, Row, SpanContext, SpanResolver};

/// Argument object passed to the host callback.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpanArgs<'a> {
    row: &'a Row,
    column: &'a ColumnDefinition,
    row_index: usize,
    col_index: usize,
}

/// Wrap `method`. A throwing callback or an unrecognized return value means
/// "no merge" for that cell.
pub(crate) fn js_span_resolver(method: Function) -> SpanResolver {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Box::new(move |ctx: &SpanContext<'_>| {
        let args = SpanArgs {
            row: ctx.row,
            column: ctx.column,
            row_index: ctx.row_index,
            col_index: ctx.col_index,
        };
        let Ok(arg) = args.serialize(&serializer) else {
            return RawSpan::None;
        };
        match method.call1(&JsValue::NULL, &arg) {
            Ok(value) if value.is_undefined() || value.is_null() => RawSpan::None,
            Ok(value) => serde_wasm_bindgen::from_value(value).unwrap_or_default(),
            Err(e) => {
                warn!(row = ctx.row_index, col = ctx.col_index, error = ?e, "span callback threw");
                RawSpan::None
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CellSpan;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn args_use_col_index_key() {
        let row = Row::new().with("name", "a");
        let column = ColumnDefinition::new("name", 100.0);
        let args = SpanArgs {
            row: &row,
            column: &column,
            row_index: 3,
            col_index: 1,
        };
        let value = args
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap();
        let col = js_sys::Reflect::get(&value, &JsValue::from_str("colIndex")).unwrap();
        assert_eq!(col.as_f64(), Some(1.0));
        let row_index = js_sys::Reflect::get(&value, &JsValue::from_str("rowIndex")).unwrap();
        assert_eq!(row_index.as_f64(), Some(3.0));
    }

    #[wasm_bindgen_test]
    fn callback_sees_column_position() {
        let method = Function::new_with_args("a", "return a.colIndex === 0 ? [1, 2] : null;");
        let resolver = js_span_resolver(method);
        let row = Row::new().with("name", "a");
        let column = ColumnDefinition::new("name", 100.0);
        let span_at = |col_index| {
            CellSpan::normalize(&resolver(&SpanContext {
                row: &row,
                column: &column,
                row_index: 0,
                col_index,
            }))
        };
        assert_eq!(span_at(0), CellSpan { row_span: 1, col_span: 2 });
        assert_eq!(span_at(1), CellSpan { row_span: 1, col_span: 1 });
    }

    #[wasm_bindgen_test]
    fn throwing_callback_means_no_merge() {
        let resolver = js_span_resolver(Function::new_no_args("throw new Error('x');"));
        let row = Row::new();
        let column = ColumnDefinition::new("name", 100.0);
        let raw = resolver(&SpanContext {
            row: &row,
            column: &column,
            row_index: 0,
            col_index: 0,
        });
        assert_eq!(CellSpan::normalize(&raw), CellSpan { row_span: 1, col_span: 1 });
    }
}
