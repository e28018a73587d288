use axum::response::Html;

use crate::config::TtsVoice;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="/static/styles.css">
    <link rel="icon" type="image/x-icon" href="/static/favicon.ico">
    <title>Video Voiceover</title>
</head>
<body>
    <div class="container">
        <img src="/static/logo.png" alt="Logo" class="logo">
        <h1>Video Voiceover</h1>

        <h2>1. Upload video</h2>
        <form id="upload-form" action="/upload-video/" method="post" enctype="multipart/form-data">
            <input type="file" id="video" name="video" accept="video/*">
            <button type="submit">Upload</button>
        </form>

        <h2>2. Generate speech</h2>
        <form id="speech-form" action="/text-to-speech/" method="post">
            <textarea id="text" name="text" rows="4" cols="50" placeholder="Enter your text here..."></textarea>
            <div class="controls">
                <label for="voice">Voice:</label>
                <select id="voice" name="voice">
{voice_options}
                </select>
                <button type="submit" class="generate-btn">Generate</button>
            </div>
        </form>

        <h2>3. Combine</h2>
        <form id="combine-form" action="/combine/" method="post">
            <input type="text" id="video_path" name="video_path" placeholder="Video path">
            <input type="text" id="audio_path" name="audio_path" placeholder="Audio path">
            <input type="number" id="start_time" name="start_time" value="0" step="0.1" min="0">
            <button type="submit">Combine</button>
        </form>

        <pre id="result"></pre>
    </div>
    <script>
        const result = document.getElementById("result");
        async function submit(form, fill) {
            const body = form.enctype === "multipart/form-data"
                ? new FormData(form)
                : new URLSearchParams(new FormData(form));
            const response = await fetch(form.action, { method: "POST", body });
            const json = await response.json();
            result.textContent = JSON.stringify(json, null, 2);
            if (response.ok) fill(json);
        }
        const bind = (id, fill) => document.getElementById(id).addEventListener("submit", (e) => {
            e.preventDefault();
            submit(e.target, fill);
        });
        bind("upload-form", (j) => { document.getElementById("video_path").value = j.video_path; });
        bind("speech-form", (j) => { document.getElementById("audio_path").value = j.audio_path; });
        bind("combine-form", () => {});
    </script>
</body>
</html>
"#;

/// `GET /`
pub async fn index() -> Html<String> {
    Html(render_page())
}

fn render_page() -> String {
    let default_voice = TtsVoice::default();
    let options = TtsVoice::KNOWN
        .iter()
        .map(|voice| {
            let selected = if *voice == default_voice { " selected" } else { "" };
            format!(
                "                    <option value=\"{}\"{}>{}</option>",
                voice.as_str(),
                selected,
                voice.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    PAGE.replace("{voice_options}", &options)
}
