use crate::error::PdfError;
use crate::graphics::Rect;

/// Opaque handle to a loaded image within a PdfDocument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// PDF color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Parsed image data ready for embedding into a PDF.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    /// Raw pixel data (RGB/Gray) or raw JPEG bytes.
    pub data: Vec<u8>,
    /// Separate alpha channel (grayscale), if present.
    pub smask_data: Option<Vec<u8>>,
}

/// Where a scaled image sits inside its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAnchor {
    Center,
    /// Flush with the top and right edges, as a letterhead logo sits.
    TopRight,
}

/// Computed placement of an image on a PDF page, in PDF coordinates
/// (bottom-left origin, points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Detect image format from magic bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat, PdfError> {
    if data.len() < 4 {
        return Err(PdfError::UnsupportedImage(
            "data too short to detect format".to_string(),
        ));
    }
    if data[0] == 0xFF && data[1] == 0xD8 {
        Ok(ImageFormat::Jpeg)
    } else if data[..4] == [0x89, 0x50, 0x4E, 0x47] {
        Ok(ImageFormat::Png)
    } else {
        Err(PdfError::UnsupportedImage(
            "expected JPEG or PNG".to_string(),
        ))
    }
}

/// Load and parse image data from raw bytes.
pub fn load_image(data: Vec<u8>) -> Result<ImageData, PdfError> {
    match detect_format(&data)? {
        ImageFormat::Jpeg => parse_jpeg(data),
        ImageFormat::Png => parse_png(&data),
    }
}

/// JPEG data is embedded as-is (DCTDecode); only the SOF header is read.
fn parse_jpeg(data: Vec<u8>) -> Result<ImageData, PdfError> {
    let (width, height, components) = jpeg_dimensions(&data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => {
            return Err(PdfError::UnsupportedImage(format!(
                "JPEG with {} components (expected 1 or 3)",
                n
            )))
        }
    };
    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data,
        smask_data: None,
    })
}

/// Scan for SOF0-SOF3 markers and extract width/height/components.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, u8), PdfError> {
    let len = data.len();
    let mut i = 0;
    while i + 1 < len {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        if (0xC0..=0xC3).contains(&marker) {
            if i + 9 >= len {
                return Err(PdfError::ImageDecode("JPEG SOF marker truncated".to_string()));
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        if marker == 0xFF || marker == 0x00 {
            i += 1;
            continue;
        }
        // Standalone markers carry no length.
        if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        if i + 3 >= len {
            break;
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    Err(PdfError::ImageDecode("no SOF marker found in JPEG data".to_string()))
}

/// Decode a PNG to 8-bit RGB or gray, splitting any alpha channel into
/// a soft mask.
fn parse_png(data: &[u8]) -> Result<ImageData, PdfError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| PdfError::ImageDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| PdfError::ImageDecode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let (color_space, channels, has_alpha) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, 3, false),
        png::ColorType::Rgba => (ColorSpace::DeviceRGB, 4, true),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, 1, false),
        png::ColorType::GrayscaleAlpha => (ColorSpace::DeviceGray, 2, true),
        other => {
            return Err(PdfError::UnsupportedImage(format!(
                "PNG color type {:?}",
                other
            )))
        }
    };

    let (pixels, smask_data) = if has_alpha {
        let color_channels = channels - 1;
        let pixel_count = (info.width * info.height) as usize;
        let mut color = Vec::with_capacity(pixel_count * color_channels);
        let mut alpha = Vec::with_capacity(pixel_count);
        for chunk in buf.chunks_exact(channels) {
            color.extend_from_slice(&chunk[..color_channels]);
            alpha.push(chunk[color_channels]);
        }
        (color, Some(alpha))
    } else {
        (buf, None)
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        data: pixels,
        smask_data,
    })
}

/// Scale an image to fit inside `rect` (upper-left origin), preserving
/// aspect ratio, and convert the result to PDF coordinates.
pub fn calculate_placement(
    img_w: u32,
    img_h: u32,
    rect: &Rect,
    anchor: ImageAnchor,
    page_height: f64,
) -> ImagePlacement {
    let iw = img_w.max(1) as f64;
    let ih = img_h.max(1) as f64;
    let scale = (rect.width / iw).min(rect.height / ih);
    let width = iw * scale;
    let height = ih * scale;
    let (left, bottom) = rect.to_pdf_origin(page_height);

    let (x, y) = match anchor {
        ImageAnchor::Center => (
            left + (rect.width - width) / 2.0,
            bottom + (rect.height - height) / 2.0,
        ),
        ImageAnchor::TopRight => (left + rect.width - width, bottom + rect.height - height),
    };
    ImagePlacement {
        x,
        y,
        width,
        height,
    }
}
