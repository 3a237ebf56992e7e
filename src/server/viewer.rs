//! Inline HTML viewer page

/// Browser viewer: a camera-id box and an `<img>` bound to `/stream/{id}`.
/// An MJPEG stream renders natively in an image tag, so no script beyond
/// wiring the input to the stream URL is needed.
pub const VIEWER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Camera Relay Viewer</title>
  <style>
    body {
      font-family: system-ui, sans-serif;
      background: #111827;
      color: #e5e7eb;
      display: flex;
      flex-direction: column;
      align-items: center;
      min-height: 100vh;
      margin: 0;
      padding: 1.5rem 1rem;
    }
    h1 { margin: 0.5rem 0 0.75rem 0; }
    .info {
      font-size: 0.9rem;
      color: #9ca3af;
      text-align: center;
      max-width: 600px;
      margin-bottom: 1rem;
    }
    .controls {
      display: flex;
      align-items: center;
      gap: 0.5rem;
      margin-bottom: 1rem;
    }
    input {
      padding: 0.35rem 0.7rem;
      border-radius: 0.5rem;
      border: 1px solid #4b5563;
      background: #111827;
      color: #e5e7eb;
      min-width: 120px;
    }
    button {
      padding: 0.4rem 0.9rem;
      border-radius: 999px;
      border: none;
      background: #3b82f6;
      color: #eff6ff;
      font-weight: 600;
      cursor: pointer;
    }
    button:hover { background: #2563eb; }
    img {
      max-width: 100%;
      height: auto;
      border-radius: 0.75rem;
      background: #1f2937;
    }
  </style>
</head>
<body>
  <h1>Camera Relay Viewer</h1>
  <div class="info">
    Live MJPEG from any camera pushing frames to this relay.<br>
    Default camera id is <code>cam1</code>; producers POST frames to <code>/push/cam1</code>.
  </div>

  <div class="controls">
    <label for="camId">Camera ID:</label>
    <input id="camId" type="text" value="cam1" />
    <button type="button" onclick="loadStream()">View</button>
  </div>

  <img id="streamImg" src="" alt="Live stream appears here">

  <script>
    function loadStream() {
      const camId = document.getElementById('camId').value || 'cam1';
      const img = document.getElementById('streamImg');
      // Cache buster so the browser opens a fresh stream connection
      img.src = '/stream/' + encodeURIComponent(camId) + '?t=' + Date.now();
    }
    window.addEventListener('DOMContentLoaded', loadStream);
  </script>
</body>
</html>
"#;
