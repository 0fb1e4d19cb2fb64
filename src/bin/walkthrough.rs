use arbitro::{Game, PieceKind, Position};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scripted game to replay.
    #[arg(short, long, value_enum, default_value_t = Scenario::ScholarsMate)]
    scenario: Scenario,

    /// Print the board after every ply instead of only at the end.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
    ScholarsMate,
    Castling,
    EnPassant,
    Promotion,
    Stalemate,
}

fn main() {
    let args = Args::parse();
    let mut game = Game::new();

    for &(from, to) in line(args.scenario) {
        let from = Position::new(from.0, from.1);
        let to = Position::new(to.0, to.1);
        let outcome = match game.apply_move(from, to) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("script broke at {from} -> {to}: {err}");
                std::process::exit(1);
            }
        };
        if args.verbose {
            println!("{from} -> {to}");
            if let Some(captured) = &outcome.captured {
                println!("  captured {captured}");
            }
            println!("{game}\n");
        }
        if outcome.promotion_pending {
            let status = game
                .resolve_promotion(PieceKind::Queen)
                .unwrap_or_else(|err| {
                    eprintln!("promotion failed: {err}");
                    std::process::exit(1);
                });
            if args.verbose {
                println!("promoted to a queen, {status}");
            }
        }
    }

    println!("{game}");
    println!("{}", game.status());
}

type Ply = ((i8, i8), (i8, i8));

fn line(scenario: Scenario) -> &'static [Ply] {
    match scenario {
        // 1.e4 e5 2.Bc4 Nc6 3.Qh5 Nf6 4.Qxf7#
        Scenario::ScholarsMate => &[
            ((4, 1), (4, 3)),
            ((4, 6), (4, 4)),
            ((5, 0), (2, 3)),
            ((1, 7), (2, 5)),
            ((3, 0), (7, 4)),
            ((6, 7), (5, 5)),
            ((7, 4), (5, 6)),
        ],
        // 1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5 4.O-O
        Scenario::Castling => &[
            ((4, 1), (4, 3)),
            ((4, 6), (4, 4)),
            ((6, 0), (5, 2)),
            ((1, 7), (2, 5)),
            ((5, 0), (2, 3)),
            ((5, 7), (2, 4)),
            ((4, 0), (6, 0)),
        ],
        // 1.e4 a6 2.e5 d5 3.exd6
        Scenario::EnPassant => &[
            ((4, 1), (4, 3)),
            ((0, 6), (0, 5)),
            ((4, 3), (4, 4)),
            ((3, 6), (3, 4)),
            ((4, 4), (3, 5)),
        ],
        // 1.a4 b5 2.axb5 Nf6 3.b6 Ng8 4.bxc7 Nf6 5.cxb8=Q
        Scenario::Promotion => &[
            ((0, 1), (0, 3)),
            ((1, 6), (1, 4)),
            ((0, 3), (1, 4)),
            ((6, 7), (5, 5)),
            ((1, 4), (1, 5)),
            ((5, 5), (6, 7)),
            ((1, 5), (2, 6)),
            ((6, 7), (5, 5)),
            ((2, 6), (1, 7)),
        ],
        // Sam Loyd's ten-move stalemate.
        Scenario::Stalemate => &[
            ((4, 1), (4, 2)),
            ((0, 6), (0, 4)),
            ((3, 0), (7, 4)),
            ((0, 7), (0, 5)),
            ((7, 4), (0, 4)),
            ((7, 6), (7, 4)),
            ((0, 4), (2, 6)),
            ((0, 5), (7, 5)),
            ((7, 1), (7, 3)),
            ((5, 6), (5, 5)),
            ((2, 6), (3, 6)),
            ((4, 7), (5, 6)),
            ((3, 6), (1, 6)),
            ((3, 7), (3, 2)),
            ((1, 6), (1, 7)),
            ((3, 2), (7, 6)),
            ((1, 7), (2, 7)),
            ((5, 6), (6, 5)),
            ((2, 7), (4, 5)),
        ],
    }
}
