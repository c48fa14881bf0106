//! JavaScript host binding.
//!
//! ```javascript
//! import init, { GridLayoutHandle } from 'xlgrid';
//! await init();
//! const grid = new GridLayoutHandle((column) => ({ width: widths[column], height: 70 }));
//! grid.setGridDimensions(rows, columns);
//! grid.relayout();
//! container.onscroll = () => {
//!     grid.setViewportOffset(container.scrollLeft, container.scrollTop);
//!     grid.relayout();
//!     render(grid.cellsIntersecting(container.scrollLeft, container.scrollTop, w, h));
//! };
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::error::GridError;
use crate::layout::{GridLayoutConfig, GridLayoutEngine, SizingDelegate};
use crate::types::{Rect, Size};

/// A failed sizing callback: the column and the text of what went wrong
type CallbackFailure = (usize, String);

/// Delegate that forwards sizing to a JS callback `(column) => {width, height}`
struct JsSizingDelegate {
    callback: Function,
    /// First failure since the last `relayout`, surfaced in its error
    failure: RefCell<Option<CallbackFailure>>,
}

impl JsSizingDelegate {
    fn record_failure(&self, column: usize, message: String) {
        tracing::warn!(column, %message, "sizing callback failed");
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some((column, message));
        }
    }
}

impl SizingDelegate for JsSizingDelegate {
    fn size_for_column(&self, column: usize) -> Size {
        let arg = JsValue::from_f64(column as f64);
        match self.callback.call1(&JsValue::NULL, &arg) {
            Ok(value) => serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
                self.record_failure(column, format!("unreadable size: {e}"));
                Size::ZERO
            }),
            Err(thrown) => {
                self.record_failure(column, thrown_message(&thrown));
                Size::ZERO
            }
        }
    }
}

/// Text of a thrown JS value: `Error.message`, a thrown string, or its debug form
fn thrown_message(thrown: &JsValue) -> String {
    if let Some(err) = thrown.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    thrown.as_string().unwrap_or_else(|| format!("{thrown:?}"))
}

/// Replace the zero-size rejection caused by a failed callback with the
/// callback's own failure, so JS sees the exception text.
fn with_callback_failure(err: GridError, failure: Option<CallbackFailure>) -> GridError {
    match (err, failure) {
        (GridError::InvalidColumnSize { column, .. }, Some((failed, message)))
            if column == failed =>
        {
            GridError::Delegate { column, message }
        }
        (err, _) => err,
    }
}

/// Grid layout engine exported to JavaScript
#[wasm_bindgen]
pub struct GridLayoutHandle {
    engine: GridLayoutEngine,
    // The engine only holds a weak reference; this keeps the callback alive.
    delegate: Rc<JsSizingDelegate>,
}

#[wasm_bindgen]
impl GridLayoutHandle {
    /// Create a handle around a sizing callback and an optional config object.
    ///
    /// # Errors
    /// Returns an error if `config` is present but invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(size_for_column: Function, config: JsValue) -> Result<GridLayoutHandle, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config.is_undefined() || config.is_null() {
            GridLayoutConfig::default()
        } else {
            let config: GridLayoutConfig = serde_wasm_bindgen::from_value(config)?;
            config.validate()?;
            config
        };

        let delegate = Rc::new(JsSizingDelegate {
            callback: size_for_column,
            failure: RefCell::new(None),
        });
        let mut engine = GridLayoutEngine::new(config);
        engine.set_delegate(&delegate);

        Ok(Self {
            engine,
            delegate,
        })
    }

    #[wasm_bindgen(js_name = "setGridDimensions")]
    pub fn set_grid_dimensions(&mut self, row_count: u32, column_count: u32) {
        self.engine
            .set_grid_dimensions(row_count as usize, column_count as usize);
    }

    #[wasm_bindgen(js_name = "setViewportOffset")]
    pub fn set_viewport_offset(&mut self, x: f32, y: f32) {
        self.engine.set_viewport_offset(x, y);
    }

    /// # Errors
    /// Returns an error if the sizing callback threw or produced an unusable
    /// size. A thrown exception's message is carried in the error text.
    #[wasm_bindgen]
    pub fn relayout(&mut self) -> Result<(), JsValue> {
        self.delegate.failure.borrow_mut().take();
        self.engine.relayout().map_err(|err| {
            let failure = self.delegate.failure.borrow_mut().take();
            JsValue::from(with_callback_failure(err, failure))
        })
    }

    #[wasm_bindgen]
    pub fn invalidate(&mut self) {
        self.engine.invalidate();
    }

    /// `{width, height}` of the scrollable content
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = "contentExtent")]
    pub fn content_extent(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.engine.content_extent())?)
    }

    /// `{x, y, width, height}` of a cell
    ///
    /// # Errors
    /// Returns an error if the cell is outside the current layout.
    #[wasm_bindgen(js_name = "frameForCell")]
    pub fn frame_for_cell(&self, row: u32, column: u32) -> Result<JsValue, JsValue> {
        let frame = self
            .engine
            .frame_for_cell(row as usize, column as usize)?;
        Ok(serde_wasm_bindgen::to_value(&frame)?)
    }

    /// Array of `{row, column, frame, tier}` for cells overlapping the rect
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = "cellsIntersecting")]
    pub fn cells_intersecting(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<JsValue, JsValue> {
        let cells = self
            .engine
            .cells_intersecting(&Rect::new(x, y, width, height));
        Ok(serde_wasm_bindgen::to_value(&cells)?)
    }

    /// Like `cellsIntersecting`, with a numeric `zIndex` instead of a tier
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = "attributesIntersecting")]
    pub fn attributes_intersecting(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<JsValue, JsValue> {
        let attrs = self
            .engine
            .attributes_intersecting(&Rect::new(x, y, width, height));
        Ok(serde_wasm_bindgen::to_value(&attrs)?)
    }
}
