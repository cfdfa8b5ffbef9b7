use image::{GrayImage, Luma};

use super::kernel::{Kernel, KernelVariant};

/// Morphological passes the filter chain can run over a foreground mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Opening,
    Closing,
    Dilation,
    /// Closing, then opening, then dilation. The mode the driver uses.
    Combine,
}

/// Run one filter mode over a mask, producing a new mask of the same shape.
pub fn apply(mask: &GrayImage, mode: FilterMode) -> GrayImage {
    match mode {
        FilterMode::Closing => close(mask, &Kernel::of(KernelVariant::Closing), 2),
        FilterMode::Opening => open(mask, &Kernel::of(KernelVariant::Opening), 2),
        FilterMode::Dilation => dilate(mask, &Kernel::of(KernelVariant::Dilation), 2),
        FilterMode::Combine => {
            let closed = close(mask, &Kernel::of(KernelVariant::Closing), 2);
            let opened = open(&closed, &Kernel::of(KernelVariant::Opening), 2);
            dilate(&opened, &Kernel::of(KernelVariant::Dilation), 2)
        }
    }
}

/// Morphological close: `iterations` dilations followed by `iterations` erosions.
pub fn close(mask: &GrayImage, kernel: &Kernel, iterations: u32) -> GrayImage {
    let grown = dilate(mask, kernel, iterations);
    erode(&grown, kernel, iterations)
}

/// Morphological open: `iterations` erosions followed by `iterations` dilations.
pub fn open(mask: &GrayImage, kernel: &Kernel, iterations: u32) -> GrayImage {
    let shrunk = erode(mask, kernel, iterations);
    dilate(&shrunk, kernel, iterations)
}

/// Repeated dilation with the given structuring element.
pub fn dilate(mask: &GrayImage, kernel: &Kernel, iterations: u32) -> GrayImage {
    repeat(mask, kernel, iterations, false)
}

/// Repeated erosion with the given structuring element.
pub fn erode(mask: &GrayImage, kernel: &Kernel, iterations: u32) -> GrayImage {
    repeat(mask, kernel, iterations, true)
}

fn repeat(mask: &GrayImage, kernel: &Kernel, iterations: u32, eroding: bool) -> GrayImage {
    let mut out = morph(mask, kernel, eroding);
    for _ in 1..iterations {
        out = morph(&out, kernel, eroding);
    }
    out
}

/// One min/max pass with an anchored structuring element. Pixels outside
/// the image behave as the operation's identity, so erosion never eats
/// the frame border and dilation never grows from it.
fn morph(src: &GrayImage, kernel: &Kernel, eroding: bool) -> GrayImage {
    let (width, height) = src.dimensions();
    let (kw, kh) = kernel.element.dimensions();
    let (ax, ay) = kernel.anchor;
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut acc: u8 = if eroding { 255 } else { 0 };
            'scan: for ky in 0..kh {
                for kx in 0..kw {
                    if kernel.element.get_pixel(kx, ky)[0] == 0 {
                        continue;
                    }
                    let sx = x as i64 + kx as i64 - ax as i64;
                    let sy = y as i64 + ky as i64 - ay as i64;
                    let inside = sx >= 0 && sy >= 0 && sx < width as i64 && sy < height as i64;
                    let v = if inside {
                        src.get_pixel(sx as u32, sy as u32)[0]
                    } else if eroding {
                        255
                    } else {
                        0
                    };
                    if eroding {
                        if v < acc {
                            acc = v;
                            if acc == 0 {
                                break 'scan;
                            }
                        }
                    } else if v > acc {
                        acc = v;
                        if acc == 255 {
                            break 'scan;
                        }
                    }
                }
            }
            out.put_pixel(x, y, Luma([acc]));
        }
    }
    out
}
