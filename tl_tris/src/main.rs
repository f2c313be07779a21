use clap::Parser;
use console::{Key, Term};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tris_link::{Link, Peer, PeerCommand, StepResult};

mod render;

/// tl_tris - terminal tris over a point-to-point text link
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen for a peer on this address (e.g. 127.0.0.1:7777)
    #[arg(short, long, conflicts_with = "connect")]
    listen: Option<String>,

    /// Connect to a waiting peer at this address
    #[arg(short, long)]
    connect: Option<String>,

    /// Fixed handshake token (drawn at random when omitted)
    #[arg(short, long)]
    token: Option<u32>,

    /// Step timeout in milliseconds
    #[arg(long, default_value_t = 200)]
    step_timeout_ms: u64,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Establish the TCP stand-in for the point-to-point transport
    let stream = match (&args.listen, &args.connect) {
        (Some(addr), None) => {
            println!("Waiting for a peer on {addr}...");
            let listener = TcpListener::bind(addr).await?;
            let (stream, remote) = listener.accept().await?;
            println!("Peer connected from {remote}");
            stream
        }
        (None, Some(addr)) => TcpStream::connect(addr).await?,
        _ => anyhow::bail!("pass exactly one of --listen or --connect"),
    };
    stream.set_nodelay(true)?;

    let link = spawn_link(stream);

    // Open the peer session; this emits the handshake
    let mut builder = Peer::builder(link).step_timeout_break_ms(args.step_timeout_ms);
    if let Some(token) = args.token {
        builder = builder.token(token);
    }
    let mut peer = builder.open()?;

    println!("=== tl_tris - tris over a text link ===");
    println!("Handshake token: {}", peer.session().token());
    println!("Controls:");
    println!("  1-9 - place your mark (left to right, top to bottom)");
    println!("  r - request a rematch");
    println!("  y/n - accept/decline a rematch offer");
    println!("  q - quit");
    println!();

    // Spawn keyboard input task with separate term
    let keyboard_sender = peer.sender();
    let keyboard_task = tokio::task::spawn_blocking(move || {
        let input_term = Term::stdout();
        loop {
            if let Ok(key) = input_term.read_key() {
                let command = match key {
                    Key::Char(c @ '1'..='9') => {
                        let index = c as usize - '1' as usize;
                        Some(PeerCommand::Move {
                            row: index / 3,
                            col: index % 3,
                        })
                    }
                    Key::Char('r') | Key::Char('R') => Some(PeerCommand::RequestReplay),
                    Key::Char('y') | Key::Char('Y') => Some(PeerCommand::AcceptReplay),
                    Key::Char('n') | Key::Char('N') => Some(PeerCommand::DeclineReplay),
                    Key::Char('q') | Key::Char('Q') => {
                        let _ = keyboard_sender.send(PeerCommand::Stop);
                        break;
                    }
                    _ => None,
                };

                if let Some(command) = command
                    && keyboard_sender.send(command).is_err()
                {
                    break;
                }
            }
        }
    });

    // Create rendering terminal (separate from input)
    let render_term = Term::stdout();

    // Main step loop - processes events and renders state
    let mut notice = None;
    loop {
        match peer.step().await {
            StepResult::Stop => {
                println!("Session stopped");
                break;
            }
            StepResult::LinkClosed => {
                notice = Some("Peer disconnected. Press q to quit.");
            }
            StepResult::Changed(_) | StepResult::Timeout => {}
        }
        render::draw(&render_term, &peer.snapshot(), &peer.stats())?;
        if let Some(notice) = notice {
            render_term.write_line(notice)?;
        }
    }

    // Wait for keyboard task to finish
    keyboard_task.abort();
    let _ = keyboard_task.await;

    Ok(())
}

/// Bridge a TCP stream into the link channel pair
///
/// One line per protocol message: the reader task forwards inbound lines
/// until the socket ends (which ends the link's inbound stream), the writer
/// task frames outbound messages with a trailing newline.
fn spawn_link(stream: TcpStream) -> Link {
    let (read_half, mut write_half) = stream.into_split();
    let (inbound_tx, inbound_rx) = flume::unbounded::<String>();
    let (outbound_tx, outbound_rx) = flume::unbounded::<String>();

    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if inbound_tx.send(line).is_err() {
                break;
            }
        }
        tracing::info!("transport reader finished");
    });

    tokio::spawn(async move {
        while let Ok(message) = outbound_rx.recv_async().await {
            let framed = format!("{message}\n");
            if write_half.write_all(framed.as_bytes()).await.is_err() {
                tracing::warn!("transport writer failed, dropping outbound traffic");
                break;
            }
        }
    });

    Link::from_parts(outbound_tx, inbound_rx)
}
