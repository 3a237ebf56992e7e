//! Multipart framing for the MJPEG wire format
//!
//! Consumers receive one unbounded `multipart/x-mixed-replace` byte stream
//! and demultiplex it into discrete frames on the boundary marker. Each
//! frame is wrapped as:
//!
//! ```text
//! --frame\r\n
//! Content-Type: image/jpeg\r\n\r\n
//! <raw JPEG bytes>\r\n
//! ```

use bytes::{BufMut, Bytes, BytesMut};

/// Boundary token between frames
pub const BOUNDARY: &str = "frame";

/// Content type of the whole stream response
pub const STREAM_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";
const PART_TRAILER: &[u8] = b"\r\n";

/// Wrap one JPEG payload as a multipart unit
pub fn encode_frame(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(PART_HEADER.len() + payload.len() + PART_TRAILER.len());
    buf.put_slice(PART_HEADER);
    buf.put_slice(payload);
    buf.put_slice(PART_TRAILER);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_layout() {
        let encoded = encode_frame(b"JPEGDATA");
        assert_eq!(
            &encoded[..],
            b"--frame\r\nContent-Type: image/jpeg\r\n\r\nJPEGDATA\r\n" as &[u8]
        );
    }

    #[test]
    fn test_content_type_names_boundary() {
        assert!(STREAM_CONTENT_TYPE.ends_with(&format!("boundary={}", BOUNDARY)));
    }
}
