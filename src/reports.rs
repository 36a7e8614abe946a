//! Human-readable report texts for inspect queries.

use crate::Address;
use crate::games::tictactoe::{GameState, PairKey};
use ethers::types::U256;
use std::collections::BTreeMap;
use tracing::instrument;

/// Usage text for unrecognized inspect commands.
pub const HELP: &str = "\n\nInput does not match any case. Try \"status,<address>,<address>\" for game status\n\
Try \"game-key,<your-address>\" for your game-keys\n\
Or \"balance,<your-address>\" for balance report.\n";

/// Status of the game between `a` and `b`, scores listed in that order.
#[instrument(skip(game))]
pub fn status(game: Option<&GameState>, a: &Address, b: &Address) -> String {
    let Some(game) = game else {
        return "\n\nGame does not exist!! Make a move with \"<opponent_address>,<row>,<col>\"\nTo start playing.\n"
            .to_string();
    };

    let board = game.board().display();
    match game.current_turn() {
        None => format!(
            "\n\nThe match has ended. Start a new one.\n\n{}\n\nScores: {} {} x {} {}\n",
            board,
            a,
            game.score_of(a),
            game.score_of(b),
            b
        ),
        Some(turn) => {
            let heading = if *game.turn_count() == 1 {
                "Welcome to Dic Dac Doe!"
            } else {
                "Match underway!"
            };
            format!(
                "\n\n{}\n\nGame Key: {}\n\nBoard:\n{}\n\nPlayer Turn: {}\n",
                heading,
                game.key(),
                board,
                turn
            )
        }
    }
}

/// Game keys an address plays in.
pub fn game_keys(keys: &[PairKey]) -> String {
    let keys: Vec<&str> = keys.iter().map(PairKey::as_str).collect();
    format!("\n\nYour Game-Keys: [{}]", keys.join(", "))
}

/// Token balances of an address as a JSON object of decimal strings.
pub fn balance(balances: Option<&BTreeMap<Address, U256>>) -> String {
    let json: serde_json::Map<String, serde_json::Value> = balances
        .into_iter()
        .flatten()
        .map(|(token, amount)| (token.to_string(), amount.to_string().into()))
        .collect();
    format!("Current Balance: {}", serde_json::Value::Object(json))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
    }

    fn bob() -> Address {
        "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap()
    }

    #[test]
    fn test_status_missing_game() {
        assert!(status(None, &alice(), &bob()).contains("Game does not exist"));
    }

    #[test]
    fn test_status_after_first_move_welcomes() {
        let mut game = GameState::new(alice(), bob());
        game.play(&alice(), 0, 0).unwrap();
        let text = status(Some(&game), &alice(), &bob());
        assert!(text.contains("Welcome to Dic Dac Doe!"));
        assert!(text.contains(&format!("Player Turn: {}", bob())));
        assert!(text.contains("X |   |  "));
    }

    #[test]
    fn test_status_underway() {
        let mut game = GameState::new(alice(), bob());
        game.play(&alice(), 0, 0).unwrap();
        game.play(&bob(), 1, 1).unwrap();
        assert!(status(Some(&game), &alice(), &bob()).contains("Match underway!"));
    }

    #[test]
    fn test_status_ended_shows_scores_in_query_order() {
        let mut game = GameState::new(alice(), bob());
        game.finish_round(Some(&bob()));
        let text = status(Some(&game), &alice(), &bob());
        assert!(text.contains("The match has ended"));
        assert!(text.contains(&format!("Scores: {} 0 x 1 {}", alice(), bob())));
    }

    #[test]
    fn test_balance_report() {
        let token: Address = "0xae7f61ecf06c65405560166b259c54031428a9c4".parse().unwrap();
        let balances = BTreeMap::from([(token, U256::from(25))]);
        assert_eq!(
            balance(Some(&balances)),
            format!("Current Balance: {{\"{}\":\"25\"}}", token)
        );
        assert_eq!(balance(None), "Current Balance: {}");
    }

    #[test]
    fn test_game_keys_report() {
        let key = PairKey::new(&alice(), &bob());
        assert_eq!(game_keys(&[key.clone()]), format!("\n\nYour Game-Keys: [{}]", key));
        assert_eq!(game_keys(&[]), "\n\nYour Game-Keys: []");
    }
}
