//! Redrawing loaded emoji images at the size they are displayed.
//!
//! The remote images are far larger than a line of text. Once one loads we
//! draw it into a canvas sized for the surrounding font and the device pixel
//! ratio, preferring the browser's high-quality `createImageBitmap` resize
//! and falling back to the core Lanczos resampler.

use jot_editor_core::{Raster, ResampleError, TargetSize, lanczos_resize, parse_css_px};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, ImageBitmap,
    ImageBitmapOptions, ImageData, ResizeQuality, Window,
};

use crate::error::ResizeError;
use crate::platform::capabilities;

/// Target raster size for `img`, from its parent's computed font size.
pub fn target_size_for(img: &HtmlImageElement) -> TargetSize {
    let window = web_sys::window();
    let font_px = window.as_ref().and_then(|w| {
        let element = img
            .parent_element()
            .or_else(|| w.document()?.document_element())?;
        let style = w.get_computed_style(&element).ok()??;
        parse_css_px(&style.get_property_value("font-size").ok()?)
    });
    let dpr = window.map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    TargetSize::from_font_size(font_px, dpr)
}

/// Draw `img` into a new square canvas of `target.device_px`.
pub async fn resample(
    img: &HtmlImageElement,
    target: TargetSize,
) -> Result<HtmlCanvasElement, ResizeError> {
    let (width, height) = (img.natural_width(), img.natural_height());
    if width == 0 || height == 0 {
        return Err(ResampleError::EmptySource { width, height }.into());
    }

    let window = web_sys::window().ok_or(ResizeError::NoWindow)?;
    let document = window.document().ok_or(ResizeError::NoWindow)?;
    let size = target.device_px;
    let canvas = create_canvas(&document, size, size)?;
    let ctx = context_2d(&canvas)?;

    if capabilities().accelerated_resize {
        match draw_bitmap(&window, &ctx, img, size).await {
            Ok(()) => return Ok(canvas),
            Err(e) => tracing::debug!(error = %e, "createImageBitmap resize failed, using lanczos"),
        }
    }

    draw_lanczos(&document, &ctx, img, size)?;
    Ok(canvas)
}

async fn draw_bitmap(
    window: &Window,
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    size: u32,
) -> Result<(), ResizeError> {
    let options = ImageBitmapOptions::new();
    options.set_resize_width(size);
    options.set_resize_height(size);
    options.set_resize_quality(ResizeQuality::High);

    let promise =
        window.create_image_bitmap_with_html_image_element_and_image_bitmap_options(img, &options)?;
    let bitmap: ImageBitmap = JsFuture::from(promise).await?.dyn_into()?;

    ctx.set_image_smoothing_enabled(true);
    // Not every web-sys build exposes the setter.
    js_sys::Reflect::set(
        ctx,
        &JsValue::from_str("imageSmoothingQuality"),
        &JsValue::from_str("high"),
    )?;
    let result = ctx.draw_image_with_image_bitmap_and_dw_and_dh(
        &bitmap,
        0.0,
        0.0,
        f64::from(size),
        f64::from(size),
    );
    bitmap.close();
    result?;
    Ok(())
}

fn draw_lanczos(
    document: &Document,
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    size: u32,
) -> Result<(), ResizeError> {
    let (width, height) = (img.natural_width(), img.natural_height());
    let scratch = create_canvas(document, width, height)?;
    let scratch_ctx = context_2d(&scratch)?;
    scratch_ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
    let pixels = scratch_ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;

    let src = Raster::new(width, height, pixels.data().0)?;
    let out = lanczos_resize(&src, size)?;
    let data =
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(out.rgba()), out.width(), out.height())?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    Ok(())
}

fn create_canvas(document: &Document, width: u32, height: u32) -> Result<HtmlCanvasElement, ResizeError> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ResizeError::Dom("created canvas is not an HTMLCanvasElement".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, ResizeError> {
    canvas
        .get_context("2d")?
        .ok_or(ResizeError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ResizeError::NoContext)
}

/// Give the canvas the image's class and accessible name, displayed at 1em.
pub fn style_canvas(canvas: &HtmlCanvasElement, class_name: &str, label: &str) -> Result<(), ResizeError> {
    canvas.set_class_name(class_name);
    canvas.set_attribute("role", "img")?;
    canvas.set_attribute("aria-label", label)?;
    canvas.set_draggable(false);
    let style = canvas.style();
    style.set_property("width", "1em")?;
    style.set_property("height", "1em")?;
    style.set_property("vertical-align", "-0.125em")?;
    Ok(())
}

/// Replace a loaded emoji image with its resampled canvas.
///
/// Returns false when the image left the document while resampling; it is
/// then left alone.
pub async fn upgrade_image(img: &HtmlImageElement, class_name: &str) -> Result<bool, ResizeError> {
    let target = target_size_for(img);
    let canvas = resample(img, target).await?;
    style_canvas(&canvas, class_name, &img.alt())?;

    if !img.is_connected() {
        tracing::trace!(alt = %img.alt(), "emoji image detached before resample finished");
        return Ok(false);
    }
    img.replace_with_with_node_1(&canvas)?;
    Ok(true)
}
