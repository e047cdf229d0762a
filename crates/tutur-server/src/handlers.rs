use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tutur_engine::{Engine, TranslatorState};
use tutur_types::{LanguagePair, TranslateRequest, TranslationResult, normalize};

pub const MAX_TEXT_LEN: usize = 500;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct TranslateQuery {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub text: String,
    pub sense: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBody {
    pub source_lang: String,
    pub target_lang: String,
    #[serde(default)]
    pub text: String,
    pub sense_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    source_lang: String,
    target_lang: String,
    matched: bool,
    ambiguous: bool,
    translation: Option<String>,
    senses: Option<Vec<SenseBody>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SenseBody {
    sense_key: String,
    label: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguageBody {
    id: String,
    display_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairBody {
    source_lang: String,
    target_lang: String,
    entries: usize,
}

#[derive(Serialize)]
struct LanguagesResponse {
    languages: Vec<LanguageBody>,
    pairs: Vec<PairBody>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBody {
    pub source_lang: String,
    pub target_lang: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/languages", get(languages))
        .route("/v1/translate", get(translate_query).post(translate_body))
        .route("/v1/swap", post(swap))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn languages(State(state): State<AppState>) -> Response {
    let dict = state.engine.dictionary();
    let response = LanguagesResponse {
        languages: dict
            .languages()
            .iter()
            .map(|lang| LanguageBody {
                id: lang.id.clone(),
                display_name: lang.display_name.clone(),
            })
            .collect(),
        pairs: dict
            .pairs()
            .into_iter()
            .map(|pair| PairBody {
                source_lang: pair.source.clone(),
                target_lang: pair.target.clone(),
                entries: dict.table(pair).map_or(0, |table| table.len()),
            })
            .collect(),
    };
    cached(&state, "public, max-age=3600", Json(response))
}

async fn translate_query(
    State(state): State<AppState>,
    Query(params): Query<TranslateQuery>,
) -> Result<Response, ApiError> {
    let request = validate(&state.engine, params.source, params.target, params.text, params.sense)?;
    let response = translate(&state.engine, request);
    Ok(cached(&state, "public, max-age=300", Json(response)))
}

async fn translate_body(
    State(state): State<AppState>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let request = validate(
        &state.engine,
        body.source_lang,
        body.target_lang,
        body.text,
        body.sense_key,
    )?;
    Ok(Json(translate(&state.engine, request)))
}

async fn swap(
    State(state): State<AppState>,
    Json(body): Json<SwapBody>,
) -> Result<Json<SwapBody>, ApiError> {
    check_pair(&state.engine, &body.source_lang, &body.target_lang)?;
    let swapped = TranslatorState::new(
        LanguagePair::new(body.source_lang, body.target_lang),
        body.input,
        body.output,
    )
    .swap();
    Ok(Json(SwapBody {
        source_lang: swapped.pair.source,
        target_lang: swapped.pair.target,
        input: swapped.input,
        output: swapped.output,
    }))
}

fn validate(
    engine: &Engine,
    source_lang: String,
    target_lang: String,
    text: String,
    sense_key: Option<String>,
) -> Result<TranslateRequest, ApiError> {
    check_pair(engine, &source_lang, &target_lang)?;
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::bad_request(format!(
            "text must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    let sense_key = sense_key.filter(|key| !key.trim().is_empty());
    if sense_key.is_none() && normalize(&text).is_empty() {
        return Err(ApiError::bad_request("text is required"));
    }
    Ok(TranslateRequest {
        source_lang,
        target_lang,
        text,
        sense_key,
    })
}

fn check_pair(engine: &Engine, source: &str, target: &str) -> Result<(), ApiError> {
    for id in [source, target] {
        if engine.dictionary().language(id).is_none() {
            return Err(ApiError::UnknownLanguage(id.to_string()));
        }
    }
    if source == target {
        return Err(ApiError::bad_request(
            "source and target languages must differ",
        ));
    }
    if !engine.dictionary().serves(&LanguagePair::new(source, target)) {
        return Err(ApiError::bad_request(format!(
            "no phrase table for {source}-{target}"
        )));
    }
    Ok(())
}

fn translate(engine: &Engine, request: TranslateRequest) -> TranslateResponse {
    let result = engine.handle(&request);
    let mut response = TranslateResponse {
        source_lang: request.source_lang,
        target_lang: request.target_lang,
        matched: result.matched(),
        ambiguous: result.ambiguous(),
        translation: None,
        senses: None,
    };
    match result {
        TranslationResult::Matched(text) => response.translation = Some(text),
        TranslationResult::Ambiguous(senses) => {
            response.senses = Some(
                senses
                    .into_iter()
                    .map(|sense| SenseBody {
                        sense_key: sense.key,
                        label: sense.label,
                    })
                    .collect(),
            );
        }
        TranslationResult::NotFound => {}
    }
    response
}

fn cached(state: &AppState, policy: &'static str, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static(policy))],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
