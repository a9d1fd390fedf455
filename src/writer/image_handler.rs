//! Image handling for PDF generation.
//!
//! Image boxes carry their pixels as data URLs. This module decodes them and
//! produces Image XObjects (PDF spec Section 8.9).
//!
//! # Supported Formats
//!
//! - **JPEG**: Pass-through embedding using DCTDecode filter
//! - **PNG**: Decoded and re-encoded with FlateDecode; alpha becomes an SMask
//!
//! The declared MIME type decides the decoder: `image/png` is decoded as PNG,
//! everything else is embedded as JPEG.

use std::io::Write;

use base64::Engine;

use crate::object::{Object, ObjectRef};

/// Image format for PDF embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (DCTDecode filter)
    Jpeg,
    /// PNG image (FlateDecode filter)
    Png,
}

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Get the number of color components.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// A parsed `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared MIME type, lowercased; empty when absent
    pub mime: String,
    /// Decoded payload
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Parse `data:[<mime>][;base64],<payload>`.
    ///
    /// Non-base64 payloads are taken as raw bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_overlay::writer::DataUrl;
    ///
    /// let url = DataUrl::parse("data:image/png;base64,aGk=")?;
    /// assert_eq!(url.mime, "image/png");
    /// assert_eq!(url.data, b"hi");
    /// # Ok::<(), pdf_overlay::writer::ImageError>(())
    /// ```
    pub fn parse(url: &str) -> Result<Self, ImageError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::InvalidDataUrl("missing data: scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidDataUrl("missing payload separator".to_string()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let data = if is_base64 {
            base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| ImageError::InvalidDataUrl(e.to_string()))?
        } else {
            payload.as_bytes().to_vec()
        };

        Ok(Self { mime, data })
    }

    /// Whether the declared type is PNG.
    pub fn is_png(&self) -> bool {
        self.mime == "image/png"
    }
}

/// Image data for PDF embedding.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per component (usually 8)
    pub bits_per_component: u8,
    /// Color space
    pub color_space: ColorSpace,
    /// Image format
    pub format: ImageFormat,
    /// Encoded image data
    pub data: Vec<u8>,
    /// Optional soft mask (alpha channel) data, Flate-compressed
    pub soft_mask: Option<Vec<u8>>,
}

impl ImageData {
    /// Decode the image carried by a data URL.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let parsed = DataUrl::parse(url)?;
        if parsed.is_png() {
            Self::from_png(&parsed.data)
        } else {
            Self::from_jpeg(parsed.data)
        }
    }

    /// Load a JPEG image from raw JPEG data.
    ///
    /// JPEG images can be embedded directly without transcoding.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Load a PNG image from raw PNG data.
    pub fn from_png(data: &[u8]) -> Result<Self, ImageError> {
        use image::GenericImageView;

        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;

        let (width, height) = img.dimensions();
        let pixel_count = (width as usize) * (height as usize);

        let (color_space, pixels, alpha) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (ColorSpace::DeviceGray, img.to_luma8().into_raw(), None)
            },
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let mut gray = Vec::with_capacity(pixel_count);
                let mut alpha_channel = Vec::with_capacity(pixel_count);
                for pixel in la.pixels() {
                    gray.push(pixel.0[0]);
                    alpha_channel.push(pixel.0[1]);
                }
                (ColorSpace::DeviceGray, gray, Some(alpha_channel))
            },
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = img.to_rgba8();
                let mut rgb = Vec::with_capacity(pixel_count * 3);
                let mut alpha_channel = Vec::with_capacity(pixel_count);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    alpha_channel.push(pixel.0[3]);
                }
                (ColorSpace::DeviceRGB, rgb, Some(alpha_channel))
            },
            _ => (ColorSpace::DeviceRGB, img.to_rgb8().into_raw(), None),
        };

        // Fully opaque alpha adds nothing
        let alpha = alpha.filter(|a| a.iter().any(|&v| v != 0xFF));

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Png,
            data: compress_image_data(&pixels)?,
            soft_mask: alpha.map(|a| compress_image_data(&a)).transpose()?,
        })
    }

    /// Build the Image XObject, pointing at `smask` when the image has alpha.
    pub fn to_xobject(&self, smask: Option<ObjectRef>) -> Object {
        let filter = match self.format {
            ImageFormat::Jpeg => "DCTDecode",
            ImageFormat::Png => "FlateDecode",
        };
        let mut entries = vec![
            ("Type", Object::name("XObject")),
            ("Subtype", Object::name("Image")),
            ("Width", Object::Integer(self.width as i64)),
            ("Height", Object::Integer(self.height as i64)),
            ("ColorSpace", Object::name(self.color_space.pdf_name())),
            ("BitsPerComponent", Object::Integer(self.bits_per_component as i64)),
            ("Filter", Object::name(filter)),
        ];
        if let Some(mask) = smask {
            entries.push(("SMask", mask.into()));
        }
        Object::stream(entries, self.data.clone())
    }

    /// Build the soft mask (alpha channel) XObject.
    pub fn soft_mask_xobject(&self) -> Option<Object> {
        self.soft_mask.as_ref().map(|mask_data| {
            Object::stream(
                vec![
                    ("Type", Object::name("XObject")),
                    ("Subtype", Object::name("Image")),
                    ("Width", Object::Integer(self.width as i64)),
                    ("Height", Object::Integer(self.height as i64)),
                    ("ColorSpace", Object::name("DeviceGray")),
                    ("BitsPerComponent", Object::Integer(8)),
                    ("Filter", Object::name("FlateDecode")),
                ],
                mask_data.clone(),
            )
        })
    }
}

/// Image embedding error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The data URL is malformed
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Failed to decode image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Failed to compress image data
    #[error("Compression error: {0}")]
    CompressionError(String),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),
}

/// Parse JPEG header to extract dimensions and color space.
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace), ImageError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidData("Not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Padding and standalone markers carry no length
        if marker == 0xFF || marker == 0x00 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }

        // SOF markers (Start of Frame)
        if matches!(
            marker,
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE | 0xCF
        ) {
            if pos + 7 >= data.len() {
                return Err(ImageError::InvalidData("Truncated JPEG header".to_string()));
            }

            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let color_space = match data[pos + 7] {
                1 => ColorSpace::DeviceGray,
                4 => ColorSpace::DeviceCMYK,
                _ => ColorSpace::DeviceRGB,
            };

            if width == 0 || height == 0 {
                return Err(ImageError::InvalidData("JPEG has zero dimensions".to_string()));
            }
            return Ok((width, height, color_space));
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += length;
    }

    Err(ImageError::InvalidData("Could not find JPEG dimensions".to_string()))
}

/// Compress image data using Flate.
fn compress_image_data(data: &[u8]) -> Result<Vec<u8>, ImageError> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ImageError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ImageError::CompressionError(e.to_string()))
}
