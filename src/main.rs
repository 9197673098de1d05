use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use blackjack_table::{
    CardView, Choice, GameEngine, Outcome, Participant, PlayerSeat, Replay, RoundEvent,
    TableConfig,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play blackjack against the dealer")]
struct Args {
    /// Player name; asked for interactively when omitted.
    #[arg(long)]
    name: Option<String>,

    /// Seed for reproducible shuffles.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON table config (`playerName`, `seed`).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

struct ConsoleSeat<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> ConsoleSeat<R, W> {
    /// `None` once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt<T, F>(&mut self, question: &str, parse: F, on_eof: T) -> io::Result<T>
    where
        F: Fn(&str) -> Result<T, blackjack_table::GameError>,
    {
        loop {
            writeln!(self.out, "{question}")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(on_eof);
            };
            match parse(&line) {
                Ok(answer) => return Ok(answer),
                Err(err) => writeln!(self.out, "Error: {err}, you must enter 1 or 2")?,
            }
        }
    }

    /// Asks only when neither the flags nor the config file named the player.
    fn ask_name(&mut self, config: &mut TableConfig) -> io::Result<()> {
        if config.player_name.is_some() {
            return Ok(());
        }
        writeln!(self.out, "What's your name?")?;
        self.out.flush()?;
        if let Some(name) = self.read_line()? {
            config.player_name = Some(name);
        }
        Ok(())
    }

    fn show_hand(&mut self, name: &str, cards: &[CardView], total: Option<u16>) -> io::Result<()> {
        writeln!(self.out, "---- {name}'s Hand -----")?;
        for card in cards {
            match card {
                CardView::Visible(card) => writeln!(self.out, "=> {card}")?,
                CardView::Hidden => writeln!(self.out, "=> Second card is hidden")?,
            }
        }
        if let Some(total) = total {
            writeln!(self.out, "=> Total: {total}")?;
        }
        Ok(())
    }

    fn show_table(&mut self, engine: &GameEngine) -> io::Result<()> {
        let player = engine.player();
        let cards: Vec<CardView> = player
            .hand()
            .cards_for_display()
            .iter()
            .map(|&card| CardView::Visible(card))
            .collect();
        self.show_hand(player.name(), &cards, Some(player.total()))?;
        let snapshot = engine.snapshot();
        self.show_hand(
            engine.dealer().name(),
            &snapshot.dealer_cards,
            snapshot.dealer_total,
        )
    }

    fn announce(&mut self, engine: &GameEngine, outcome: Outcome) -> io::Result<()> {
        let name = engine.player().name();
        match outcome {
            Outcome::PlayerBlackjack => {
                writeln!(self.out, "Congratulations, you hit blackjack! {name} wins!")
            }
            Outcome::DealerBlackjack => {
                writeln!(self.out, "Sorry, the dealer hit blackjack. {name} loses.")
            }
            Outcome::PlayerBust => writeln!(self.out, "Sorry, {name} busted."),
            Outcome::DealerBust => {
                writeln!(self.out, "Congratulations, the dealer busted. {name} wins!")
            }
            Outcome::PlayerWins => writeln!(self.out, "Congratulations, {name} wins!"),
            Outcome::DealerWins => writeln!(self.out, "Sorry, {name} loses."),
            Outcome::Tie => writeln!(self.out, "It's a tie."),
        }
    }

    fn render(&mut self, engine: &GameEngine, event: &RoundEvent) -> io::Result<()> {
        let name = engine.player().name().to_string();
        match event {
            RoundEvent::Dealt => {
                self.show_table(engine)?;
                writeln!(self.out, "{name}'s turn.")
            }
            RoundEvent::PlayerHit(draw) => {
                writeln!(self.out, "Dealing card to {name}: {}", draw.card)?;
                writeln!(self.out, "{name}'s total is now: {}", draw.total)
            }
            RoundEvent::PlayerStayed { total } => {
                writeln!(self.out, "{name} stays at {total}.")?;
                writeln!(self.out, "Dealer's turn.")
            }
            RoundEvent::DealerPlayed(play) => {
                for card in &play.drawn {
                    writeln!(self.out, "Dealing new card to dealer: {card}")?;
                }
                let dealer = engine.dealer();
                self.show_hand(dealer.name(), &dealer.full_display(), Some(play.total))?;
                if play.outcome.is_none() {
                    writeln!(self.out, "Dealer stays at {}", play.total)?;
                }
                Ok(())
            }
            RoundEvent::Resolved(outcome) => self.announce(engine, *outcome),
        }
    }
}

impl<R: BufRead, W: Write> PlayerSeat for ConsoleSeat<R, W> {
    fn choose(&mut self, _engine: &GameEngine) -> Choice {
        self.prompt(
            "What would you like to do? 1) hit 2) stay",
            Choice::from_code,
            Choice::Stay,
        )
        .unwrap_or_else(|err| {
            tracing::warn!(%err, "console unavailable, staying");
            Choice::Stay
        })
    }

    fn observe(&mut self, engine: &GameEngine, event: &RoundEvent) {
        if let Err(err) = self.render(engine, event) {
            tracing::warn!(%err, "failed to write to console");
        }
    }
}

fn init_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    let mut config = match &args.config {
        Some(path) => TableConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TableConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let stdin = io::stdin();
    let mut seat = ConsoleSeat {
        input: stdin.lock(),
        out: io::stdout(),
    };

    if args.name.is_some() {
        config.player_name = args.name;
    }
    seat.ask_name(&mut config)?;

    let mut engine = config.build_engine();
    tracing::debug!(?config, "table ready");

    loop {
        engine.play_round(&mut seat)?;
        writeln!(seat.out)?;
        let replay = seat.prompt(
            "Would you like to play again? 1) yes 2) no, exit",
            Replay::from_code,
            Replay::Exit,
        )?;
        if replay == Replay::Exit {
            break;
        }
        writeln!(seat.out, "Starting new game...\n")?;
        engine.reset_round();
    }

    writeln!(seat.out, "Goodbye")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use blackjack_table::{Card, Deck, Rank, Suit};

    use super::*;

    fn seat(input: &str) -> ConsoleSeat<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleSeat {
            input: Cursor::new(input.as_bytes().to_vec()),
            out: Vec::new(),
        }
    }

    fn written(seat: &ConsoleSeat<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(seat.out.clone()).unwrap()
    }

    #[test]
    fn invalid_choices_are_reprompted() {
        let engine = GameEngine::with_seed("Ada", 1);
        let mut seat = seat("3\nfoo\n1\n");
        assert_eq!(seat.choose(&engine), Choice::Hit);
        let out = written(&seat);
        assert_eq!(out.matches("Error:").count(), 2);
        assert_eq!(out.matches("1) hit 2) stay").count(), 3);
    }

    #[test]
    fn end_of_input_stays() {
        let engine = GameEngine::with_seed("Ada", 1);
        let mut seat = seat("");
        assert_eq!(seat.choose(&engine), Choice::Stay);
    }

    #[test]
    fn replay_prompt_retries_until_answered() {
        let mut seat = seat("maybe\n2\n");
        let replay = seat
            .prompt("Play again?", Replay::from_code, Replay::Again)
            .unwrap();
        assert_eq!(replay, Replay::Exit);
        assert_eq!(written(&seat).matches("Error:").count(), 1);
    }

    #[test]
    fn replay_exits_at_end_of_input() {
        let mut seat = seat("");
        let replay = seat
            .prompt("Play again?", Replay::from_code, Replay::Exit)
            .unwrap();
        assert_eq!(replay, Replay::Exit);
    }

    #[test]
    fn asks_name_when_config_has_none() {
        let mut config = TableConfig::from_json(r#"{"seed": 3}"#).unwrap();
        let mut seat = seat("Grace\n");
        seat.ask_name(&mut config).unwrap();
        assert_eq!(config.player_name(), "Grace");
        assert!(written(&seat).contains("What's your name?"));
    }

    #[test]
    fn keeps_configured_name_without_asking() {
        let mut config = TableConfig::from_json(r#"{"playerName": "Ada"}"#).unwrap();
        let mut seat = seat("Grace\n");
        seat.ask_name(&mut config).unwrap();
        assert_eq!(config.player_name(), "Ada");
        assert!(written(&seat).is_empty());
    }

    #[test]
    fn console_round_renders_outcome() {
        let deck = Deck::stacked([
            Card::new(Suit::Hearts, Rank::Ten),
            Card::new(Suit::Hearts, Rank::Ten),
            Card::new(Suit::Hearts, Rank::Eight),
            Card::new(Suit::Hearts, Rank::Seven),
        ]);
        let mut engine = GameEngine::with_deck("Ada", deck);
        let mut seat = seat("x\n2\n");
        assert_eq!(engine.play_round(&mut seat), Ok(Outcome::PlayerWins));
        let out = written(&seat);
        assert!(out.contains("=> Second card is hidden"));
        assert!(out.contains("Ada stays at 18."));
        assert!(out.contains("Dealer stays at 17"));
        assert!(out.contains("Congratulations, Ada wins!"));
    }
}
