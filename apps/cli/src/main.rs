//! SIGEV-PYME terminal front end.
//!
//! Thin orchestration over `sigev-client`: parse arguments, wire up the
//! [`AppContext`], run one command, print results. All business rules
//! live in `sigev-core`; all transport lives in `sigev-client`.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sigev_client::session::{ProfileUpdate, RegisterRequest};
use sigev_client::{ApiError, AppContext, ClientConfig, FileTokenStore, TracingNotifier};
use sigev_core::types::{CompanyCreate, PaymentMethod, ProductCreate, User};
use sigev_core::{DocumentKind, Money, SaleDraft};

#[derive(Parser, Debug)]
#[command(name = "sigev")]
#[command(author, version, about = "Gestión de ventas e inventario para pymes", long_about = None)]
struct Cli {
    /// Path to configuration file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override log level
    #[arg(short, long, default_value = "warn", env = "SIGEV_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account (signs in on success)
    Register(RegisterArgs),

    /// Drop the stored session
    Logout,

    /// Show the current user
    Me {
        /// Refetch from the server instead of the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Update the profile
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        telefono: Option<String>,
        #[arg(long)]
        direccion: Option<String>,
    },

    /// Show or register the company
    Company {
        #[command(subcommand)]
        action: CompanyCommand,
    },

    /// List the inventory with stock status and alerts
    Inventory,

    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductCommand,
    },

    /// Record a sale
    Sell(SellArgs),

    /// List recorded sales, or show one in detail
    Sales {
        /// Sale id for the detail view
        id: Option<String>,

        /// Delete the sale instead of showing it (requires an id)
        #[arg(long)]
        delete: bool,
    },

    /// Monthly revenue over the trailing six months
    Report,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    telefono: Option<String>,
    #[arg(long)]
    direccion: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CompanyCommand {
    Show,
    Register(CompanyArgs),
    Update {
        id: String,
        #[command(flatten)]
        datos: CompanyArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct CompanyArgs {
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    ruc: String,
    #[arg(long, default_value = "")]
    correo: String,
    #[arg(long, default_value = "")]
    telefono: String,
    #[arg(long, default_value = "")]
    direccion: String,
    #[arg(long, default_value = "Perú")]
    pais: String,
    #[arg(long, default_value_t = 1)]
    empleados: i64,
}

impl CompanyArgs {
    fn into_payload(self) -> CompanyCreate {
        CompanyCreate {
            nombre: self.nombre,
            correo: self.correo,
            telefono: self.telefono,
            direccion: self.direccion,
            pais: self.pais,
            numero_empleados: self.empleados,
            ruc: self.ruc,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Unit price in soles, e.g. 5.50
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Alert threshold (Low at or below this stock)
        #[arg(long, default_value_t = sigev_core::DEFAULT_MIN_STOCK_ALERT)]
        min_stock: i64,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        stock: i64,
        #[arg(long, default_value_t = sigev_core::DEFAULT_MIN_STOCK_ALERT)]
        min_stock: i64,
    },
    Delete {
        id: String,
    },
    /// Receive stock: add a purchased quantity to the current stock
    Restock {
        id: String,
        #[arg(long)]
        qty: i64,
    },
}

#[derive(Args, Debug)]
struct SellArgs {
    /// Line item as PRODUCT_ID=QTY (repeatable)
    #[arg(long = "item", required = true)]
    items: Vec<String>,

    /// Issue a factura instead of a boleta
    #[arg(long)]
    factura: bool,

    /// DNI (boleta) or RUC (factura)
    #[arg(long)]
    documento: String,

    /// Razón social (required for factura)
    #[arg(long, default_value = "")]
    nombre: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    telefono: String,

    /// efectivo | tarjeta
    #[arg(long, default_value = "efectivo")]
    metodo: String,

    #[arg(long, default_value = "")]
    observaciones: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = ClientConfig::load_or_default(cli.config.clone());
    let tokens = Arc::new(FileTokenStore::new().map_err(friendly)?);
    let ctx = AppContext::new(config, tokens).map_err(friendly)?;

    let result = run(&ctx, cli.command).await;
    ctx.shutdown();

    result
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    let scope = ctx.view_scope();

    match command {
        Command::Login { email, password } => {
            let user = ctx
                .session
                .login(&email, &password, &scope)
                .await
                .map_err(friendly)?;
            println!("Sesión iniciada como {}", user.user_name);
        }

        Command::Register(args) => {
            let request = RegisterRequest {
                user_name: args.name,
                email: args.email,
                password: args.password,
                telefono: args.telefono,
                direccion: args.direccion,
            };
            let user = ctx
                .session
                .register(&request, &scope)
                .await
                .map_err(friendly)?;
            println!("Cuenta creada. Sesión iniciada como {}", user.user_name);
        }

        Command::Logout => {
            ctx.session.logout(&scope).await.map_err(friendly)?;
            println!("Sesión cerrada.");
        }

        Command::Me { refresh } => {
            let user = if refresh {
                require_session(ctx, &scope).await?;
                ctx.users.refresh(&ctx.client, &scope).await.map_err(friendly)?
            } else {
                require_session(ctx, &scope).await?
            };
            print_user(&user);
        }

        Command::Profile {
            name,
            telefono,
            direccion,
        } => {
            require_session(ctx, &scope).await?;
            let update = ProfileUpdate {
                user_name: name,
                telefono,
                direccion,
            };
            let user = ctx
                .session
                .update_profile(&update, &scope)
                .await
                .map_err(friendly)?;
            println!("Perfil actualizado.");
            print_user(&user);
        }

        Command::Company { action } => {
            let user = require_session(ctx, &scope).await?;
            match action {
                CompanyCommand::Show => {
                    match ctx.companies().my_company(&user, &scope).await.map_err(friendly)? {
                        Some(company) => {
                            println!("{} (RUC {})", company.nombre, company.ruc);
                            println!(
                                "  {} — {} empleados",
                                company.direccion, company.numero_empleados
                            );
                        }
                        None => println!("Sin empresa registrada."),
                    }
                }
                CompanyCommand::Register(datos) => {
                    let payload = datos.into_payload();
                    let company = ctx
                        .companies()
                        .register(&payload, &scope)
                        .await
                        .map_err(friendly)?;
                    // The user record now carries the new companyId
                    let _ = ctx.users.refresh(&ctx.client, &scope).await;
                    println!("Empresa registrada: {} (RUC {})", company.nombre, company.ruc);
                }
                CompanyCommand::Update { id, datos } => {
                    let payload = datos.into_payload();
                    let company = ctx
                        .companies()
                        .update(&id, &payload, &scope)
                        .await
                        .map_err(friendly)?;
                    println!("Empresa actualizada: {} (RUC {})", company.nombre, company.ruc);
                }
                CompanyCommand::Delete { id } => {
                    ctx.companies().delete(&id, &scope).await.map_err(friendly)?;
                    let _ = ctx.users.refresh(&ctx.client, &scope).await;
                    println!("Empresa eliminada.");
                }
            }
        }

        Command::Inventory => {
            require_session(ctx, &scope).await?;
            let products = ctx.products().list(&scope).await.map_err(friendly)?;
            if products.is_empty() {
                println!("Inventario vacío.");
                return Ok(());
            }
            for p in &products {
                println!(
                    "{:<30} {:>8} stock {:>5}  {}",
                    p.name,
                    p.price.to_string(),
                    p.stock,
                    sigev_core::stock::status_message(p.stock, p.min_stock_alert)
                );
            }
            let delivered = sigev_client::notify::announce_alerts(&TracingNotifier, &products);
            if delivered > 0 {
                println!("{} producto(s) requieren atención.", delivered);
            }
        }

        Command::Product { action } => {
            require_session(ctx, &scope).await?;
            match action {
                ProductCommand::Add {
                    name,
                    description,
                    price,
                    stock,
                    min_stock,
                } => {
                    let payload = ProductCreate {
                        name,
                        description,
                        stock,
                        price: Money::from_soles_f64(price),
                        min_stock_alert: min_stock,
                    };
                    let product = ctx.products().create(&payload, &scope).await.map_err(friendly)?;
                    println!("Producto creado: {} ({})", product.name, product.id);
                }
                ProductCommand::Update {
                    id,
                    name,
                    description,
                    price,
                    stock,
                    min_stock,
                } => {
                    let payload = ProductCreate {
                        name,
                        description,
                        stock,
                        price: Money::from_soles_f64(price),
                        min_stock_alert: min_stock,
                    };
                    let product = ctx
                        .products()
                        .update(&id, &payload, &scope)
                        .await
                        .map_err(friendly)?;
                    println!("Producto actualizado: {}", product.name);
                }
                ProductCommand::Delete { id } => {
                    ctx.products().delete(&id, &scope).await.map_err(friendly)?;
                    println!("Producto eliminado.");
                }
                ProductCommand::Restock { id, qty } => {
                    let product = ctx
                        .products()
                        .restock(&id, qty, &scope)
                        .await
                        .map_err(friendly)?;
                    println!(
                        "Stock actualizado: {} ahora con {} unidades",
                        product.name, product.stock
                    );
                }
            }
        }

        Command::Sell(args) => {
            require_session(ctx, &scope).await?;
            let sale = record_sale(ctx, args).await?;
            println!(
                "Venta registrada: {} — total {} ({})",
                sale.id, sale.total, sale.estado_pago
            );
        }

        Command::Sales { id, delete } => {
            require_session(ctx, &scope).await?;
            match id {
                Some(id) if delete => {
                    ctx.sales().delete(&id, &scope).await.map_err(friendly)?;
                    println!("Venta eliminada.");
                }
                Some(id) => {
                    let sale = ctx.sales().get(&id, &scope).await.map_err(friendly)?;
                    println!("{} — {} — {}", sale.id, sale.cliente_nombre, sale.total);
                    for item in sale.items.unwrap_or_default() {
                        println!(
                            "  {} x{} a {} = {}",
                            item.producto_id,
                            item.cantidad,
                            item.precio_unitario,
                            item.line_total()
                        );
                    }
                }
                None if delete => bail!("--delete necesita el id de una venta."),
                None => {
                    let sales = ctx.sales().list_mine(&scope).await.map_err(friendly)?;
                    if sales.is_empty() {
                        println!("Sin ventas registradas.");
                    }
                    for sale in &sales {
                        println!(
                            "{}  {:<20} {:>10}  {}",
                            sale.effective_timestamp(),
                            sale.cliente_nombre,
                            sale.total.to_string(),
                            sale.id
                        );
                    }
                }
            }
        }

        Command::Report => {
            require_session(ctx, &scope).await?;
            let buckets = ctx.sales().monthly_report(&scope).await.map_err(friendly)?;
            for bucket in &buckets {
                println!(
                    "{} {}  {:>12}  ({} ventas)",
                    bucket.label,
                    bucket.year,
                    bucket.total.to_string(),
                    bucket.count
                );
            }
            if let Some(current) = buckets.last() {
                println!("Mes actual: {}", current.total);
            }
        }
    }

    Ok(())
}

/// Builds the sale through the draft so the boleta/factura rules apply
/// exactly as they do in the app.
async fn record_sale(ctx: &AppContext, args: SellArgs) -> Result<sigev_core::types::Sale> {
    let scope = ctx.view_scope();
    let products = ctx.products().list(&scope).await.map_err(friendly)?;

    let mut draft = SaleDraft::new();
    for raw in &args.items {
        let (id, qty) = parse_item(raw)?;
        let product = products
            .iter()
            .find(|p| p.id == id || p.name == id)
            .ok_or_else(|| anyhow!("Producto no encontrado: {}", id))?;
        draft.add_item(product, qty).map_err(business)?;
    }

    if args.factura {
        draft.set_document_kind(DocumentKind::Factura).map_err(business)?;
    } else if draft.receipt_locked() {
        bail!(
            "El total {} supera el límite para boleta; use --factura.",
            draft.total()
        );
    }

    draft.customer.documento = args.documento;
    draft.customer.nombre = args.nombre;
    draft.customer.email = args.email;
    draft.customer.telefono = args.telefono;
    draft.metodo_pago = match args.metodo.to_lowercase().as_str() {
        "efectivo" => PaymentMethod::Efectivo,
        "tarjeta" => PaymentMethod::Tarjeta,
        other => bail!("Método de pago desconocido: {}", other),
    };
    draft.observaciones = args.observaciones;

    let kind = match draft.kind() {
        DocumentKind::Boleta => "boleta",
        DocumentKind::Factura => "factura",
    };
    println!("Emitiendo {} por {}", kind, draft.total());

    let payload = draft.payload().map_err(business)?;
    ctx.sales().create(&payload, &scope).await.map_err(friendly)
}

/// Parses `PRODUCT_ID=QTY`.
fn parse_item(raw: &str) -> Result<(String, i64)> {
    let (id, qty) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Formato de ítem inválido '{}': use ID=CANTIDAD", raw))?;
    let qty: i64 = qty
        .parse()
        .with_context(|| format!("Cantidad inválida en '{}'", raw))?;
    Ok((id.to_string(), qty))
}

/// Ensures the stored session is usable, hydrating the cache once.
async fn require_session(
    ctx: &AppContext,
    scope: &tokio_util::sync::CancellationToken,
) -> Result<User> {
    if let Some(user) = ctx.users.get().await {
        return Ok(user);
    }
    match ctx.users.initialize(&ctx.client, scope).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => bail!("No hay sesión activa. Ejecuta `sigev login` primero."),
        Err(e) => Err(friendly(e)),
    }
}

fn print_user(user: &User) {
    println!("{} <{}>", user.user_name, user.email);
    println!(
        "  rol: {:?}  activo: {}",
        user.user_role(),
        user.is_active()
    );
    match (&user.company_nombre, &user.company_id) {
        (Some(nombre), _) => println!("  empresa: {}", nombre),
        (None, Some(id)) => println!("  empresa: {}", id),
        (None, None) => println!("  empresa: sin registrar"),
    }
}

/// Maps an API error to its user-facing Spanish message.
fn friendly(e: ApiError) -> anyhow::Error {
    anyhow!("{}", e.user_message())
}

/// Business-rule rejections already carry a printable message.
fn business(e: sigev_core::CoreError) -> anyhow::Error {
    anyhow!("{}", e)
}
