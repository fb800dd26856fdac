//! Annual distance and the diesel baseline it is compared against.

use super::inputs::ModelInputs;
use super::reference::DIESEL_CO2_KG_PER_LITRE;
use super::result::{DieselVsEv, Distance, Emissions, EnergyCost};

/// Distance the delivered energy covers, per truck and for the fleet.
///
/// `fleet_size` is at least 1 by construction of [`ModelInputs`].
pub fn distance(inputs: &ModelInputs, daily_energy_kwh: f64) -> Distance {
    let fleet = f64::from(inputs.fleet_size());
    let km_per_truck_per_day = (daily_energy_kwh / fleet) / inputs.ev_kwh_per_km();
    let annual_km_per_truck = km_per_truck_per_day * f64::from(inputs.operating_days());
    Distance {
        km_per_truck_per_day,
        annual_km_per_truck,
        annual_km_fleet: annual_km_per_truck * fleet,
    }
}

/// Diesel cost, CO₂ and tolls for the same distance, against the EV figures.
pub fn compare(
    inputs: &ModelInputs,
    distance: &Distance,
    energy: &EnergyCost,
    co2: &Emissions,
) -> DieselVsEv {
    let km = distance.annual_km_fleet;
    let litres_per_km = inputs.diesel_l_per_100km() / 100.0;

    let diesel_litres = km * litres_per_km;
    let diesel_cost_eur = diesel_litres * inputs.diesel_price_eur_per_litre();
    let diesel_co2_kg = diesel_litres * DIESEL_CO2_KG_PER_LITRE;

    let baseline_toll_eur = km * inputs.tolled_share() * inputs.toll_rate_eur_per_km();
    let ev_toll_eur = if inputs.ev_toll_exempt() {
        0.0
    } else {
        baseline_toll_eur
    };

    let ev_cost_eur = energy.annual_cost_eur;
    let ev_co2_kg = co2.annual_ev_co2_kg;
    let cost_savings_eur = diesel_cost_eur - ev_cost_eur;
    let toll_savings_eur = baseline_toll_eur - ev_toll_eur;

    let fleet = f64::from(inputs.fleet_size());

    DieselVsEv {
        diesel_litres,
        diesel_cost_eur,
        diesel_co2_kg,
        ev_cost_eur,
        ev_co2_kg,
        baseline_toll_eur,
        ev_toll_eur,
        cost_savings_eur,
        co2_savings_kg: diesel_co2_kg - ev_co2_kg,
        toll_savings_eur,
        total_savings_incl_toll_eur: cost_savings_eur + toll_savings_eur,
        diesel_cost_per_km_eur: litres_per_km * inputs.diesel_price_eur_per_litre(),
        ev_cost_per_km_eur: inputs.ev_kwh_per_km() * energy.effective_price_eur_per_kwh,
        diesel_co2_per_km_kg: litres_per_km * DIESEL_CO2_KG_PER_LITRE,
        ev_co2_per_km_kg: inputs.ev_kwh_per_km() * co2.effective_co2_kg_per_kwh,
        diesel_cost_per_truck_eur: diesel_cost_eur / fleet,
        ev_cost_per_truck_eur: ev_cost_eur / fleet,
        diesel_co2_per_truck_kg: diesel_co2_kg / fleet,
        ev_co2_per_truck_kg: ev_co2_kg / fleet,
    }
}
