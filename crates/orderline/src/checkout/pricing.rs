//! Order quote: subtotal, delivery fee and points discount, computed once at checkout.

use crate::checkout::{Cart, CheckoutError};
use crate::config::PricingConfig;
use crate::money::{self, to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfilment {
    Delivery { address: String },
    Pickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Redemption {
    #[default]
    None,
    /// As many points as the balance and the order value allow.
    Max,
    Exact(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderQuote {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub points_redeemed: u32,
    pub points_discount: f64,
    pub order_total: f64,
}

impl OrderQuote {
    /// `floor(order_total × rate)`.
    pub fn points_earned(&self, pricing: &PricingConfig) -> u32 {
        money::floor_points(self.order_total, pricing.points_per_currency_unit)
    }

    pub fn amount_minor(&self) -> i64 {
        money::to_minor_units(self.order_total)
    }
}

/// Most points that may be redeemed against `total`: its value in points, capped by the balance.
pub fn max_redeemable(total: f64, balance: u32, pricing: &PricingConfig) -> u32 {
    money::floor_points(total, pricing.points_per_discount_unit).min(balance)
}

pub fn quote(
    cart: &Cart,
    fulfilment: &Fulfilment,
    redemption: Redemption,
    balance: u32,
    pricing: &PricingConfig,
) -> Result<OrderQuote, CheckoutError> {
    let subtotal = to_decimal(cart.subtotal());
    let delivery_fee = match fulfilment {
        Fulfilment::Delivery { .. } => to_decimal(pricing.delivery_fee),
        Fulfilment::Pickup => Decimal::ZERO,
    };
    let before_discount = subtotal + delivery_fee;

    let cap = max_redeemable(to_f64(before_discount), u32::MAX, pricing);
    let points_redeemed = match redemption {
        Redemption::None => 0,
        Redemption::Max => cap.min(balance),
        Redemption::Exact(requested) => {
            if requested > balance {
                return Err(CheckoutError::InsufficientPoints {
                    requested,
                    available: balance,
                });
            }
            if requested > cap {
                return Err(CheckoutError::RedemptionTooLarge {
                    requested,
                    max: cap,
                });
            }
            requested
        }
    };

    let points_discount =
        Decimal::from(points_redeemed) / Decimal::from(pricing.points_per_discount_unit.max(1));
    let order_total = (before_discount - points_discount).max(Decimal::ZERO);

    Ok(OrderQuote {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(delivery_fee),
        points_redeemed,
        points_discount: to_f64(points_discount),
        order_total: to_f64(order_total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemOptions, MenuItem};

    fn two_item_cart() -> Cart {
        let mut cart = Cart::new();
        let burger = MenuItem::new("burger", "Burger", 8.0);
        cart.add(&burger, ItemOptions::default(), true).unwrap();
        cart.add(&burger, ItemOptions::default(), true).unwrap();
        cart.add(&MenuItem::new("wrap", "Wrap", 5.5), ItemOptions::default(), true)
            .unwrap();
        cart
    }

    fn delivery() -> Fulfilment {
        Fulfilment::Delivery {
            address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_delivery_quote_with_redemption() {
        let pricing = PricingConfig::default();
        let cart = two_item_cart();

        let plain = quote(&cart, &delivery(), Redemption::None, 0, &pricing).unwrap();
        assert_eq!(plain.subtotal, 21.5);
        assert_eq!(plain.delivery_fee, 3.99);
        assert_eq!(plain.order_total, 25.49);

        let redeemed = quote(&cart, &delivery(), Redemption::Exact(500), 800, &pricing).unwrap();
        assert_eq!(redeemed.points_discount, 5.0);
        assert_eq!(redeemed.order_total, 20.49);
        assert_eq!(redeemed.amount_minor(), 2049);
        assert_eq!(redeemed.points_earned(&pricing), 204);
    }

    #[test]
    fn test_pickup_has_no_fee() {
        let quote = quote(&two_item_cart(), &Fulfilment::Pickup, Redemption::None, 0, &PricingConfig::default())
            .unwrap();
        assert_eq!(quote.delivery_fee, 0.0);
        assert_eq!(quote.order_total, 21.5);
    }

    #[test]
    fn test_redemption_limits() {
        let pricing = PricingConfig::default();
        let cart = two_item_cart();

        assert_eq!(
            quote(&cart, &delivery(), Redemption::Exact(900), 800, &pricing),
            Err(CheckoutError::InsufficientPoints {
                requested: 900,
                available: 800
            })
        );
        assert_eq!(
            quote(&cart, &delivery(), Redemption::Exact(3000), 5000, &pricing),
            Err(CheckoutError::RedemptionTooLarge {
                requested: 3000,
                max: 2549
            })
        );

        let max_by_balance = quote(&cart, &delivery(), Redemption::Max, 800, &pricing).unwrap();
        assert_eq!(max_by_balance.points_redeemed, 800);

        let max_by_value = quote(&cart, &delivery(), Redemption::Max, 5000, &pricing).unwrap();
        assert_eq!(max_by_value.points_redeemed, 2549);
        assert_eq!(max_by_value.order_total, 0.0);
    }
}
