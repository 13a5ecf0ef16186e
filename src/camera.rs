// Opens the default camera and converts frames into canvas-sized buffers.
// The host never shows the camera directly: effects read `frame()` and
// decide what ends up on the canvas.

use crate::error::Error;
use crate::types::{FrameBuffer, pack};

use image::RgbImage;
use image::imageops::{self, FilterType};
use log::{debug, info};
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Where the host gets its live frames from.
pub trait VideoSource {
    /// Pull the newest frame. On error the previous frame stays current.
    fn refresh(&mut self) -> Result<(), Error>;
    /// Most recent frame, always exactly canvas-sized.
    fn frame(&self) -> &FrameBuffer;
    /// Stop delivering frames. Calling it again is harmless.
    fn pause(&mut self);
}

// A small wrapper around nokhwa::Camera so the host stays clean.
pub struct CameraCapture {
    cam: Camera,
    latest: FrameBuffer,
    paused: bool,
}

impl CameraCapture {
    /// Open camera `index` and start streaming. Frames are resized to
    /// exactly `width`x`height`, whatever the device actually delivers.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // Fails when no device exists.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        info!(
            "camera {index} streaming at {}x{}, scaled to {width}x{height}",
            actual.width(),
            actual.height()
        );

        Ok(Self {
            cam,
            latest: FrameBuffer::new(width as usize, height as usize),
            paused: false,
        })
    }

    /// Grab one frame and convert it to canvas-sized 0x00RRGGBB pixels.
    fn grab(&mut self) -> Result<FrameBuffer, Error> {
        // Blocks until a new frame is ready.
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;
        let (fw, fh) = decoded.dimensions();
        let mut rgb_img = RgbImage::from_raw(fw, fh, decoded.into_raw())
            .ok_or_else(|| Error::CameraFrame("Decode RGB: short buffer".into()))?;

        let (w, h) = (self.latest.width as u32, self.latest.height as u32);
        if rgb_img.dimensions() != (w, h) {
            rgb_img = imageops::resize(&rgb_img, w, h, FilterType::Triangle);
        }

        let pixels = rgb_img.pixels().map(|p| pack(p[0], p[1], p[2])).collect();

        Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
    }
}

impl VideoSource for CameraCapture {
    fn refresh(&mut self) -> Result<(), Error> {
        if self.paused {
            return Ok(());
        }
        self.latest = self.grab()?;
        Ok(())
    }

    fn frame(&self) -> &FrameBuffer {
        &self.latest
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        if let Err(e) = self.cam.stop_stream() {
            debug!("stop_stream failed: {e}");
        }
    }
}
