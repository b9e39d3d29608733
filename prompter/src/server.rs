use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;

use crate::assistant::{
    configuration::Configuration,
    graph::PromptGraph,
    state::{SessionInput, SessionOutput},
};

pub struct AppState {
    graph: PromptGraph,
}

pub fn router(graph: PromptGraph) -> Router {
    let audio = ServeFile::new(&graph.config().audio_file_path);
    let state = Arc::new(AppState { graph });

    Router::new()
        .route("/", get(serve_index))
        .route("/chat", post(handle_chat))
        .route_service("/audio", audio)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(config: Configuration) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    let app = router(PromptGraph::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SessionInput>,
) -> Json<SessionOutput> {
    Json(state.graph.run(request).await)
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Text-to-Music Chatbot</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
        }
        .container {
            display: flex;
            flex-direction: column;
            gap: 16px;
        }
        input {
            width: 100%;
            padding: 10px;
            box-sizing: border-box;
        }
        button {
            padding: 10px 20px;
            background-color: #007bff;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        .block {
            white-space: pre-wrap;
            padding: 12px;
            border: 1px solid #ddd;
            border-radius: 4px;
        }
        .error {
            background-color: #f8d7da;
        }
        .warning {
            background-color: #fff3cd;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Text-to-Music Chatbot</h1>
        <label for="intent">Describe the music you want (type 'exit' to quit):</label>
        <input id="intent" placeholder="e.g. a calm piano piece for a rainy evening">
        <label for="feedback">Feedback:</label>
        <input id="feedback" placeholder="What should change after listening?">
        <button id="send" onclick="send()">Send</button>
        <div id="result"></div>
    </div>

    <script>
    function block(text, cls) {
        const el = document.createElement('div');
        el.className = 'block' + (cls ? ' ' + cls : '');
        el.textContent = text;
        return el;
    }

    async function send() {
        const input = document.getElementById('intent').value;
        const feedback = document.getElementById('feedback').value;
        const result = document.getElementById('result');
        result.replaceChildren(block('Working...'));

        try {
            const response = await fetch('/chat', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ input, feedback }),
            });
            const data = await response.json();
            result.replaceChildren();

            data.notices.forEach(n => result.appendChild(block(n, 'error')));
            if (data.terminated) {
                result.appendChild(block(data.message));
                document.getElementById('send').disabled = true;
                return;
            }
            if (data.ttm_prompt) {
                result.appendChild(block('TTM prompt: ' + data.ttm_prompt));
            }
            if (data.follow_up) {
                result.appendChild(block('Follow-up questions:\n' + data.follow_up));
            }
            if (data.refined_prompt) {
                result.appendChild(block('Refined TTM prompt: ' + data.refined_prompt));
            }
            if (data.audio && data.audio.status === 'available') {
                const audio = document.createElement('audio');
                audio.controls = true;
                audio.src = '/audio?t=' + Date.now();
                result.appendChild(audio);
                result.appendChild(block('Here is the music file.'));
            } else if (data.audio) {
                result.appendChild(block(data.audio.warning, 'warning'));
            }
        } catch (error) {
            result.replaceChildren(block('Error: ' + error.message, 'error'));
        }
    }
    </script>
</body>
</html>
"#;
