//! Checkout route handlers.
//!
//! Placement is simulated: after the configured delay the order gets a
//! reference, the promo use is counted, wallet payments are debited and the
//! cart is emptied. Nothing is sent to the restaurant.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::cart::Cart;
use wakalni_core::orders::{CheckoutDetails, CheckoutQuote, Order, order_from_cart};
use wakalni_core::promo::AppliedPromo;
use wakalni_core::{DeliveryMode, PaymentMethod, Price};

use super::profile::client_wallet;
use super::redirect_with;
use crate::db::{CatalogRepository, OrderRepository, PromotionRepository, WalletRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, load_cart, save_cart};
use crate::models::{Flash, session_keys};
use crate::state::AppState;

const CHECKOUT_PATH: &str = "/checkout";

/// Payment choices, in display order.
pub const PAYMENT_METHODS: [PaymentMethod; 3] =
    [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Wallet];

/// Reception mode picked on the summary.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub mode: DeliveryMode,
}

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mode: DeliveryMode,
    #[serde(default)]
    pub payment: PaymentMethod,
}

/// Per-field checkout errors, rendered next to each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutErrors {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
}

impl CheckoutForm {
    /// Validate the contact details; the address is only required for delivery.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(&self) -> std::result::Result<CheckoutDetails, CheckoutErrors> {
        let required = |value: &str, message: &str| {
            value.trim().is_empty().then(|| message.to_owned())
        };
        let errors = CheckoutErrors {
            customer_name: required(&self.customer_name, "Name is required"),
            customer_phone: required(&self.customer_phone, "Phone is required"),
            address: if self.mode == DeliveryMode::Delivery {
                required(&self.address, "Address is required for delivery")
            } else {
                None
            },
        };
        if errors != CheckoutErrors::default() {
            return Err(errors);
        }

        Ok(CheckoutDetails {
            customer_name: self.customer_name.trim().to_owned(),
            customer_phone: self.customer_phone.trim().to_owned(),
            address: Some(self.address.trim().to_owned()).filter(|a| !a.is_empty()),
            mode: self.mode,
            payment: self.payment,
        })
    }
}

/// Promo code form data.
#[derive(Debug, Deserialize)]
pub struct PromoForm {
    pub code: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    pub cart: Cart,
    pub quote: CheckoutQuote,
    pub mode: DeliveryMode,
    pub promo: Option<AppliedPromo>,
    /// Why a previously applied code no longer applies.
    pub promo_error: Option<String>,
    pub payment_methods: &'static [PaymentMethod],
    pub wallet_balance: Price,
    pub form: CheckoutForm,
    pub errors: CheckoutErrors,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "confirmation.html")]
pub struct ConfirmationTemplate {
    pub ctx: PageContext,
    pub order: Order,
    pub quote: CheckoutQuote,
    pub payment: PaymentMethod,
}

/// Price of the cart with the promo code held in the session.
struct Pricing {
    quote: CheckoutQuote,
    promo: Option<AppliedPromo>,
    promo_error: Option<String>,
}

/// Quote the cart, re-validating the session's promo code against it.
///
/// A code that stopped applying (cart shrank below the minimum, promotion
/// disabled) is dropped from the session and reported.
async fn price_cart(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    mode: DeliveryMode,
) -> Result<Pricing> {
    let mut promo = None;
    let mut promo_error = None;
    if let Some(code) = session.get::<String>(session_keys::APPLIED_PROMO).await? {
        let today = chrono::Utc::now().date_naive();
        match PromotionRepository::new(state.store())
            .validate(&code, cart.total_price(), today)
            .await
        {
            Ok(applied) => promo = Some(applied),
            Err(rejection) => {
                session.remove::<String>(session_keys::APPLIED_PROMO).await?;
                promo_error = Some(format!("{code}: {rejection}"));
            }
        }
    }

    let delivery_fee = CatalogRepository::new(state.store())
        .delivery_fee(cart.items().iter().map(|line| &line.restaurant_id))
        .await;
    Ok(Pricing {
        quote: CheckoutQuote::compute(cart, mode, delivery_fee, promo.as_ref()),
        promo,
        promo_error,
    })
}

/// Render the checkout page, with a status and inline errors.
async fn render(
    state: &AppState,
    session: &Session,
    ctx: PageContext,
    form: CheckoutForm,
    errors: CheckoutErrors,
) -> Result<Response> {
    let cart = load_cart(session).await?;
    let pricing = price_cart(state, session, &cart, form.mode).await?;
    let wallet_balance = WalletRepository::new(state.store())
        .ledger(&client_wallet(ctx.user.as_ref()))
        .await
        .balance();

    let status = if errors == CheckoutErrors::default() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((
        status,
        CheckoutTemplate {
            ctx,
            cart,
            quote: pricing.quote,
            mode: form.mode,
            promo: pricing.promo,
            promo_error: pricing.promo_error,
            payment_methods: &PAYMENT_METHODS,
            wallet_balance,
            form,
            errors,
        },
    )
        .into_response())
}

/// Display the checkout page.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, ctx))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    let form = CheckoutForm {
        customer_name: ctx.user_name().unwrap_or_default().to_owned(),
        mode: query.mode,
        ..CheckoutForm::default()
    };
    render(&state, &session, ctx, form, CheckoutErrors::default()).await
}

/// Place the order (simulated) and show the confirmation.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, ctx, form))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    mut ctx: PageContext,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(redirect_with(&session, CHECKOUT_PATH, Flash::error("Your cart is empty"))
            .await?
            .into_response());
    }

    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => return render(&state, &session, ctx, form, errors).await,
    };

    let pricing = price_cart(&state, &session, &cart, details.mode).await?;
    if let Some(message) = pricing.promo_error {
        return Ok(redirect_with(&session, CHECKOUT_PATH, Flash::error(message))
            .await?
            .into_response());
    }
    state.simulate_latency().await;

    let now = chrono::Utc::now();
    let promotions = PromotionRepository::new(state.store());
    if let Some(applied) = &pricing.promo {
        let redeemed = promotions
            .redeem(applied, cart.total_price(), now.date_naive())
            .await;
        if let Err(rejection) = redeemed {
            tracing::info!(code = %applied.code, %rejection, "Promotion no longer applies");
            session.remove::<String>(session_keys::APPLIED_PROMO).await?;
            let message = format!("{}: {rejection}", applied.code);
            return Ok(redirect_with(&session, CHECKOUT_PATH, Flash::error(message))
                .await?
                .into_response());
        }
    }

    let reference = OrderRepository::new(state.store()).next_reference();

    if details.payment == PaymentMethod::Wallet {
        let paid = WalletRepository::new(state.store())
            .pay(
                &client_wallet(ctx.user.as_ref()),
                pricing.quote.total,
                format!("Order {reference}"),
                Some(reference.clone()),
                now,
            )
            .await;
        if let Err(err) = paid {
            if let Some(applied) = &pricing.promo {
                promotions.release(applied).await;
            }
            if !err.is_invalid_input() {
                return Err(err.into());
            }
            return Ok(redirect_with(&session, CHECKOUT_PATH, Flash::error(err.to_string()))
                .await?
                .into_response());
        }
    }

    let order = order_from_cart(reference, &cart, &details, &pricing.quote, now);
    cart.clear();
    save_cart(&session, &cart).await?;
    session.remove::<String>(session_keys::APPLIED_PROMO).await?;

    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));
    tracing::info!(
        order_id = %order.id,
        total = %order.total,
        payment = details.payment.as_str(),
        "Order placed"
    );

    ctx.cart_count = 0;
    Ok(ConfirmationTemplate {
        ctx,
        order,
        quote: pricing.quote,
        payment: details.payment,
    }
    .into_response())
}

/// Apply a promo code to the cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session))]
pub async fn apply_promo(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PromoForm>,
) -> Result<Redirect> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return redirect_with(&session, CHECKOUT_PATH, Flash::error("Your cart is empty")).await;
    }

    let today = chrono::Utc::now().date_naive();
    let flash = match PromotionRepository::new(state.store())
        .validate(&form.code, cart.total_price(), today)
        .await
    {
        Ok(applied) => {
            session
                .insert(session_keys::APPLIED_PROMO, &applied.code)
                .await?;
            Flash::success(format!("Promo code {} applied", applied.code))
        }
        Err(rejection) => Flash::error(rejection.to_string()),
    };
    redirect_with(&session, CHECKOUT_PATH, flash).await
}

/// Drop the applied promo code.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn remove_promo(session: Session) -> Result<Redirect> {
    session.remove::<String>(session_keys::APPLIED_PROMO).await?;
    Ok(Redirect::to(CHECKOUT_PATH))
}
