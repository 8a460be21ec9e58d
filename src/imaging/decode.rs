//! AVIF decoding for round-trip verification.
//!
//! The `image` crate's `"avif"` feature only provides the encoder; its
//! decoder needs the C library dav1d. Instead the container is parsed with
//! `avif-parse` and the AV1 payload is decoded with `rav1d`, the pure Rust
//! port of dav1d. Only the primary (colour) item is decoded: verification
//! cares about pixel dimensions, not the alpha plane.

use super::encoder::CodecError;
use image::RgbImage;
use rav1d::include::dav1d::data::Dav1dData;
use rav1d::include::dav1d::dav1d::Dav1dSettings;
use rav1d::include::dav1d::headers::{
    DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
    DAV1D_PIXEL_LAYOUT_I444,
};
use rav1d::include::dav1d::picture::Dav1dPicture;
use rav1d::src::lib as dav1d;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

/// Decode AVIF file bytes to an RGB raster.
pub fn decode_avif(bytes: &[u8]) -> Result<RgbImage, CodecError> {
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(bytes))
        .map_err(|e| CodecError::Avif(format!("unreadable container: {e:?}")))?;
    decode_av1(&avif.primary_item)
}

/// Run one AV1 payload through rav1d and convert the picture to RGB.
///
/// Every exit path after `dav1d_open` goes through the single
/// `dav1d_close` at the end of the function.
fn decode_av1(payload: &[u8]) -> Result<RgbImage, CodecError> {
    let mut settings = MaybeUninit::<Dav1dSettings>::uninit();
    let settings_ptr = NonNull::new(settings.as_mut_ptr())
        .ok_or_else(|| CodecError::Avif("settings allocation failed".into()))?;
    // SAFETY: dav1d_default_settings fully initializes the pointed-to settings.
    unsafe { dav1d::dav1d_default_settings(settings_ptr) };
    let mut settings = unsafe { settings.assume_init() };
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    // SAFETY: both pointers refer to live locals for the duration of the call.
    let rc = unsafe { dav1d::dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(CodecError::Avif(format!("decoder open failed ({})", rc.0)));
    }

    let decoded = 'decode: {
        let mut data = Dav1dData::default();
        // SAFETY: `data` is a live local; the returned buffer holds `payload.len()` bytes.
        let buffer = unsafe { dav1d::dav1d_data_create(NonNull::new(&mut data), payload.len()) };
        if buffer.is_null() {
            break 'decode Err(CodecError::Avif("data buffer allocation failed".into()));
        }
        unsafe { std::ptr::copy_nonoverlapping(payload.as_ptr(), buffer, payload.len()) };

        let rc = unsafe { dav1d::dav1d_send_data(ctx, NonNull::new(&mut data)) };
        if rc.0 != 0 {
            unsafe { dav1d::dav1d_data_unref(NonNull::new(&mut data)) };
            break 'decode Err(CodecError::Avif(format!("send_data failed ({})", rc.0)));
        }

        // SAFETY: an all-zero picture is the documented "empty" state.
        let mut picture: Dav1dPicture = unsafe { std::mem::zeroed() };
        let rc = unsafe { dav1d::dav1d_get_picture(ctx, NonNull::new(&mut picture)) };
        if rc.0 != 0 {
            break 'decode Err(CodecError::Avif(format!("get_picture failed ({})", rc.0)));
        }

        let rgb = picture_to_rgb(&picture);
        unsafe { dav1d::dav1d_picture_unref(NonNull::new(&mut picture)) };
        rgb
    };

    unsafe { dav1d::dav1d_close(NonNull::new(&mut ctx)) };
    decoded
}

/// One plane of a decoded picture.
#[derive(Clone, Copy)]
struct Plane {
    ptr: *const u8,
    stride: isize,
}

impl Plane {
    /// Sample at (x, y), widened to f32. High bit depths are stored as u16.
    ///
    /// Callers keep (x, y) inside the plane's dimensions.
    fn sample(&self, x: u32, y: u32, bpc: u32) -> f32 {
        let row = y as isize * self.stride;
        if bpc <= 8 {
            // SAFETY: in-bounds per the caller contract.
            f32::from(unsafe { *self.ptr.offset(row + x as isize) })
        } else {
            // SAFETY: in-bounds per the caller contract; rav1d aligns u16 planes.
            f32::from(unsafe { *(self.ptr.offset(row + x as isize * 2) as *const u16) })
        }
    }
}

/// Convert a decoded YUV picture to 8-bit RGB using BT.601 coefficients.
fn picture_to_rgb(picture: &Dav1dPicture) -> Result<RgbImage, CodecError> {
    let width = u32::try_from(picture.p.w)
        .map_err(|_| CodecError::Avif(format!("invalid width {}", picture.p.w)))?;
    let height = u32::try_from(picture.p.h)
        .map_err(|_| CodecError::Avif(format!("invalid height {}", picture.p.h)))?;
    let bpc = picture.p.bpc as u32;
    if !(1..=16).contains(&bpc) {
        return Err(CodecError::Avif(format!("unsupported bit depth {bpc}")));
    }

    let plane = |index: usize, stride: isize| {
        picture.data[index]
            .map(|ptr| Plane {
                ptr: ptr.as_ptr() as *const u8,
                stride,
            })
            .ok_or_else(|| CodecError::Avif(format!("missing plane {index}")))
    };

    let layout = picture.p.layout;
    let (subsample_x, subsample_y) = match layout {
        DAV1D_PIXEL_LAYOUT_I400 | DAV1D_PIXEL_LAYOUT_I444 => (false, false),
        DAV1D_PIXEL_LAYOUT_I420 => (true, true),
        DAV1D_PIXEL_LAYOUT_I422 => (true, false),
        other => {
            return Err(CodecError::Avif(format!("unsupported pixel layout {other}")));
        }
    };

    let luma = plane(0, picture.stride[0])?;
    let chroma = if layout == DAV1D_PIXEL_LAYOUT_I400 {
        None
    } else {
        Some((plane(1, picture.stride[1])?, plane(2, picture.stride[1])?))
    };

    let scale = 255.0 / ((1u32 << bpc) - 1) as f32;
    let center = (1u32 << (bpc - 1)) as f32;
    let to_u8 = |v: f32| (v * scale).clamp(0.0, 255.0) as u8;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let luma_value = luma.sample(x, y, bpc);
        match chroma {
            None => {
                let v = to_u8(luma_value);
                image::Rgb([v, v, v])
            }
            Some((cb_plane, cr_plane)) => {
                let cx = if subsample_x { x / 2 } else { x };
                let cy = if subsample_y { y / 2 } else { y };
                let cb = cb_plane.sample(cx, cy, bpc) - center;
                let cr = cr_plane.sample(cx, cy, bpc) - center;
                image::Rgb([
                    to_u8(luma_value + 1.402 * cr),
                    to_u8(luma_value - 0.344_136 * cb - 0.714_136 * cr),
                    to_u8(luma_value + 1.772 * cb),
                ])
            }
        }
    }))
}
