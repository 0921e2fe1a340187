use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Instrument};

use cart_actor::{load_settings, setup_tracing, Cart, CartError, CartSystem, ChannelNotifier, ProductId, UpdateProductAmount};

#[derive(Debug, Parser)]
#[command(name = "cart_actor", about = "Manage the storefront shopping cart")]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./cart.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current cart
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product already in the cart
    Update { product_id: ProductId, amount: u32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    setup_tracing(&settings.log_filter);

    let (notifier, mut notices) = ChannelNotifier::new();
    let system = CartSystem::from_settings(&settings, Arc::new(notifier)).context("starting cart system")?;
    let client = system.cart_client.clone();

    let span = tracing::info_span!("cart_command", command = ?cli.command);
    let status = async {
        // Failures already reach the user as notices.
        let outcome = match cli.command {
            Command::Show => client.cart().await,
            Command::Add { product_id } => client.add_product(product_id).await,
            Command::Remove { product_id } => client.remove_product(product_id).await,
            Command::Update { product_id, amount } => {
                client.update_product_amount(UpdateProductAmount::new(product_id, amount)).await
            }
        };
        if let Err(e) = &outcome {
            info!(error = %e, "Command did not change the cart");
        }
        exit_status(&outcome)
    }
    .instrument(span)
    .await;

    drop(client);
    let cart = system.cart_client.snapshot();
    system.shutdown().await?;

    while let Ok(notice) = notices.try_recv() {
        eprintln!("{}", notice);
    }
    print_cart(&cart);
    Ok(ExitCode::from(status))
}

/// Process status for a command outcome: 0 on success, 1 when the cart
/// rejected the command, 2 when the controller could not be reached.
fn exit_status(outcome: &Result<Cart, CartError>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(CartError::ActorCommunicationError(_)) => 2,
        Err(_) => 1,
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for product in cart.items() {
        println!(
            "{:>6}  {:<32} {:>4} x {:>10.2}",
            product.id, product.title, product.amount, product.price
        );
    }
    println!("{} item(s), subtotal {:.2}", cart.total_amount(), cart.subtotal());
}
