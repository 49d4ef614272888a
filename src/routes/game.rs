use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::game::{CommandReply, GuessReceipt, SubmitGuessRequest},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes driving the game lifecycle of each channel.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/channels/{channel}/game",
            post(start_game).delete(end_game),
        )
        .route("/channels/{channel}/scores", get(check_scores))
        .route("/channels/{channel}/guesses", post(submit_guess))
        .route("/help", get(help))
}

/// Start a game in the channel.
pub async fn start_game(
    State(state): State<SharedState>,
    Path(channel): Path<String>,
) -> Result<Json<CommandReply>, AppError> {
    let reply = game_service::start_game(&state, &channel)?;
    Ok(Json(CommandReply::text(reply)))
}

/// End the channel's game and announce the winners.
pub async fn end_game(
    State(state): State<SharedState>,
    Path(channel): Path<String>,
) -> Result<Json<CommandReply>, AppError> {
    let reply = game_service::end_game(&state, &channel).await?;
    Ok(Json(reply.into()))
}

/// Current standings of the channel's game.
pub async fn check_scores(
    State(state): State<SharedState>,
    Path(channel): Path<String>,
) -> Result<Json<CommandReply>, AppError> {
    let reply = game_service::check_scores(&state, &channel).await?;
    Ok(Json(CommandReply::text(reply)))
}

/// Queue a guess; the outcome arrives later on the event stream.
pub async fn submit_guess(
    State(state): State<SharedState>,
    Path(channel): Path<String>,
    Json(payload): Json<SubmitGuessRequest>,
) -> Result<Json<GuessReceipt>, AppError> {
    payload.validate()?;
    let receipt = game_service::submit_guess(&state, &channel, payload)?;
    Ok(Json(receipt))
}

/// How to play.
pub async fn help() -> Json<CommandReply> {
    Json(CommandReply::text(game_service::HELP_TEXT))
}
