//! Default-assumption injection for non-formal modes.
//!
//! Three independent substitutions, each logged as exactly one assumption
//! string. User-supplied values are never overwritten; formal requests are
//! returned untouched so the validation engine sees the real gaps.

use crate::catalog::Catalog;
use crate::domain::request::{OperatingMode, PanelUsage, QuoteRequest};

pub fn apply_defaults(
    mut request: QuoteRequest,
    mode: OperatingMode,
    catalog: &Catalog,
) -> QuoteRequest {
    if mode.is_formal() {
        return request;
    }
    let defaults = catalog.defaults();

    if request.span_m.is_none() && request.usage == Some(PanelUsage::Roof) {
        request.span_m = Some(defaults.default_span_m);
        request.assumptions_used.push(format!(
            "span assumed at industry default {:.1} m (no support spacing given)",
            defaults.default_span_m
        ));
    }

    if request.structure.is_none() {
        if let Some(usage) = request.usage {
            let structure = defaults.structure_for(usage);
            request.structure = Some(structure);
            request.assumptions_used.push(format!(
                "structure assumed {structure:?} (usual for {usage:?} installs)"
            ));
        }
    }

    if request.width_m.is_none() {
        if let Some(count) = request.panel_count {
            let width = f64::from(count) * defaults.usable_width_m;
            request.width_m = Some(width);
            request.assumptions_used.push(format!(
                "width assumed {width:.2} m ({count} panels x {:.2} m usable width)",
                defaults.usable_width_m
            ));
        }
    }

    request
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::domain::request::{
        OperatingMode, PanelUsage, QuoteRequest, StructureType,
    };

    use super::apply_defaults;

    fn roof_request() -> QuoteRequest {
        QuoteRequest {
            usage: Some(PanelUsage::Roof),
            panel_count: Some(6),
            ..QuoteRequest::default()
        }
    }

    #[test]
    fn fills_span_structure_and_width_with_one_assumption_each() {
        let catalog = Catalog::fixture();
        let request = apply_defaults(roof_request(), OperatingMode::PreCotizacion, &catalog);

        assert_eq!(request.span_m, Some(3.0));
        assert_eq!(request.structure, Some(StructureType::Metal));
        assert_eq!(request.width_m, Some(6.0));
        assert_eq!(request.assumptions_used.len(), 3);
    }

    #[test]
    fn formal_mode_applies_nothing() {
        let catalog = Catalog::fixture();
        let request = apply_defaults(roof_request(), OperatingMode::Formal, &catalog);

        assert_eq!(request.span_m, None);
        assert_eq!(request.structure, None);
        assert_eq!(request.width_m, None);
        assert!(request.assumptions_used.is_empty());
    }

    #[test]
    fn user_supplied_values_are_never_overwritten() {
        let catalog = Catalog::fixture();
        let request = QuoteRequest {
            span_m: Some(4.5),
            structure: Some(StructureType::Wood),
            width_m: Some(10.0),
            ..roof_request()
        };
        let applied = apply_defaults(request, OperatingMode::PreCotizacion, &catalog);

        assert_eq!(applied.span_m, Some(4.5));
        assert_eq!(applied.structure, Some(StructureType::Wood));
        assert_eq!(applied.width_m, Some(10.0));
        assert!(applied.assumptions_used.is_empty());
    }

    #[test]
    fn span_default_only_applies_to_roofs() {
        let catalog = Catalog::fixture();
        let request = QuoteRequest {
            usage: Some(PanelUsage::Wall),
            ..QuoteRequest::default()
        };
        let applied = apply_defaults(request, OperatingMode::Informativo, &catalog);
        assert_eq!(applied.span_m, None);
    }
}
