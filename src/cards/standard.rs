//! The standard card set and board.
//!
//! Definition IDs are exposed as constants so rules code and tests can name
//! specific buildings.

use super::definition::{CardDefId, CardDefinition, CardTag, Effect, Passive, ScoreBonus};
use super::registry::Catalog;
use super::workplace::WorkplaceDefinition;

pub const FARM: CardDefId = CardDefId(1);
pub const DESIGN_OFFICE: CardDefId = CardDefId(2);
pub const ORCHARD: CardDefId = CardDefId(3);
pub const WAREHOUSE: CardDefId = CardDefId(4);
pub const CONSTRUCTION_COMPANY: CardDefId = CardDefId(5);
pub const DUAL_CONSTRUCTION: CardDefId = CardDefId(6);
pub const DORMITORY: CardDefId = CardDefId(7);
pub const FACTORY: CardDefId = CardDefId(8);
pub const LARGE_FARM: CardDefId = CardDefId(9);
pub const LAW_OFFICE: CardDefId = CardDefId(10);
pub const CHEMICAL_PLANT: CardDefId = CardDefId(11);
pub const GENERAL_CONTRACTOR: CardDefId = CardDefId(12);
pub const ROBOTICS_LAB: CardDefId = CardDefId(13);
pub const STEEL_MILL: CardDefId = CardDefId(14);
pub const COOPERATIVE: CardDefId = CardDefId(15);
pub const LABOR_UNION: CardDefId = CardDefId(16);
pub const REALTOR: CardDefId = CardDefId(17);
pub const RAILROAD: CardDefId = CardDefId(18);
pub const HEADQUARTERS: CardDefId = CardDefId(19);
pub const AUTO_FACTORY: CardDefId = CardDefId(20);
pub const MANSION: CardDefId = CardDefId(21);

impl Catalog {
    /// The standard 21-building set (42 cards) and the public board.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Catalog::new();

        catalog.register(
            CardDefinition::new(FARM, "Farm", 1, 6)
                .with_tag(CardTag::Farm)
                .with_effect(Effect::Consumables { count: 2 }, "Gain 2 consumer goods"),
            4,
        );
        catalog.register(
            CardDefinition::new(DESIGN_OFFICE, "Design Office", 1, 8)
                .with_effect(
                    Effect::DesignOffice { reveal: 5 },
                    "Reveal 5 cards, keep 1, discard the rest",
                ),
            3,
        );
        catalog.register(
            CardDefinition::new(ORCHARD, "Orchard", 2, 10)
                .with_tag(CardTag::Farm)
                .with_effect(
                    Effect::FillConsumables { up_to: 4 },
                    "Gain consumer goods until you hold 4 cards",
                ),
            2,
        );
        catalog.register(
            CardDefinition::new(WAREHOUSE, "Warehouse", 2, 10)
                .with_passive(Passive::HandLimit(4), "Hand limit +4"),
            2,
        );
        catalog.register(
            CardDefinition::new(CONSTRUCTION_COMPANY, "Construction Company", 2, 10)
                .with_effect(
                    Effect::Build { discount: 1, draw_after: 0 },
                    "Build one building at cost -1",
                ),
            3,
        );
        catalog.register(
            CardDefinition::new(DUAL_CONSTRUCTION, "Dual Construction", 2, 10)
                .with_effect(Effect::DualBuild, "Build two buildings of equal cost, paying once"),
            2,
        );
        catalog.register(
            CardDefinition::new(DORMITORY, "Dormitory", 2, 8)
                .unsellable()
                .with_passive(Passive::WorkerCap(1), "Worker cap +1"),
            2,
        );
        catalog.register(
            CardDefinition::new(FACTORY, "Factory", 3, 12)
                .with_tag(CardTag::Factory)
                .with_effect(
                    Effect::DiscardDraw { discard: 2, draw: 4 },
                    "Discard 2 cards, draw 4",
                ),
            4,
        );
        catalog.register(
            CardDefinition::new(LARGE_FARM, "Large Farm", 3, 12)
                .with_tag(CardTag::Farm)
                .with_effect(Effect::Consumables { count: 3 }, "Gain 3 consumer goods"),
            2,
        );
        catalog.register(
            CardDefinition::new(LAW_OFFICE, "Law Office", 3, 8)
                .unsellable()
                .with_passive(
                    Passive::DebtExemption(5),
                    "Forgive up to 5 unpaid wages at game end",
                ),
            2,
        );
        catalog.register(
            CardDefinition::new(CHEMICAL_PLANT, "Chemical Plant", 4, 16)
                .with_tag(CardTag::Factory)
                .with_effect(
                    Effect::DrawWhenEmpty { draw: 2, empty_draw: 4 },
                    "Draw 2 cards, or 4 if your hand is empty",
                ),
            2,
        );
        catalog.register(
            CardDefinition::new(GENERAL_CONTRACTOR, "General Contractor", 4, 14)
                .with_effect(
                    Effect::Build { discount: 0, draw_after: 2 },
                    "Build one building, then draw 2",
                ),
            2,
        );
        catalog.register(
            CardDefinition::new(ROBOTICS_LAB, "Robotics Lab", 4, 12)
                .with_effect(Effect::HireRobot, "Gain a robot worker that draws no wages"),
            2,
        );
        catalog.register(
            CardDefinition::new(STEEL_MILL, "Steel Mill", 4, 16)
                .with_tag(CardTag::Factory)
                .with_effect(Effect::Draw { count: 3 }, "Draw 3 cards"),
            2,
        );
        catalog.register(
            CardDefinition::new(COOPERATIVE, "Cooperative", 4, 10)
                .unsellable()
                .with_bonus(ScoreBonus::PerTag(CardTag::Farm, 4), "+4 VP per farm you own"),
            1,
        );
        catalog.register(
            CardDefinition::new(LABOR_UNION, "Labor Union", 4, 8)
                .unsellable()
                .with_bonus(ScoreBonus::PerWorker(4), "+4 VP per worker you own"),
            1,
        );
        catalog.register(
            CardDefinition::new(REALTOR, "Realtor", 5, 10)
                .unsellable()
                .with_bonus(ScoreBonus::PerBuilding(3), "+3 VP per building you own"),
            1,
        );
        catalog.register(
            CardDefinition::new(RAILROAD, "Railroad", 5, 18)
                .unsellable()
                .with_bonus(ScoreBonus::PerTag(CardTag::Factory, 8), "+8 VP per factory you own"),
            1,
        );
        catalog.register(
            CardDefinition::new(HEADQUARTERS, "Headquarters", 5, 20)
                .unsellable()
                .with_bonus(ScoreBonus::PerUnsellable(6), "+6 VP per unsellable building you own"),
            1,
        );
        catalog.register(
            CardDefinition::new(AUTO_FACTORY, "Auto Factory", 5, 20)
                .with_tag(CardTag::Factory)
                .with_effect(
                    Effect::DiscardDraw { discard: 3, draw: 7 },
                    "Discard 3 cards, draw 7",
                ),
            2,
        );
        catalog.register(
            CardDefinition::new(MANSION, "Mansion", 6, 28).unsellable(),
            1,
        );

        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Quarry",
                Effect::StartPlayer { draw: 1 },
                "Become start player, draw 1",
            ),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new("Mine", Effect::Draw { count: 1 }, "Draw 1 card").multi(),
        );
        catalog
            .register_workplace(WorkplaceDefinition::new("School", Effect::Hire, "Hire a worker"));
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Carpenter",
                Effect::Build { discount: 0, draw_after: 0 },
                "Build one building",
            )
            .copies([1, 2, 3]),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Stall",
                Effect::DiscardIncome { discard: 1, income: 6 },
                "Discard 1, take $6",
            )
            .opens(2),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Market",
                Effect::DiscardIncome { discard: 2, income: 12 },
                "Discard 2, take $12",
            )
            .opens(3),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "High School",
                Effect::HireUpTo { target: 4 },
                "Hire until you have 4 workers",
            )
            .opens(4),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Supermarket",
                Effect::DiscardIncome { discard: 3, income: 18 },
                "Discard 3, take $18",
            )
            .opens(5),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "University",
                Effect::HireUpTo { target: 5 },
                "Hire until you have 5 workers",
            )
            .opens(6),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Department Store",
                Effect::DiscardIncome { discard: 4, income: 24 },
                "Discard 4, take $24",
            )
            .opens(7),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Expo",
                Effect::DiscardIncome { discard: 5, income: 30 },
                "Discard 5, take $30",
            )
            .opens(8),
        );
        catalog.register_workplace(
            WorkplaceDefinition::new(
                "Monument",
                Effect::DiscardTokens { discard: 3, vp: 9 },
                "Discard 3, gain 9 VP",
            )
            .opens(9),
        );

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_size() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 21);
        assert_eq!(catalog.deck_list().len(), 42);
    }

    #[test]
    fn test_every_deck_entry_resolves() {
        let catalog = Catalog::standard();
        for id in catalog.deck_list() {
            assert!(catalog.contains(id));
        }
    }

    #[test]
    fn test_bonus_buildings_are_unsellable() {
        let catalog = Catalog::standard();
        for def in catalog.iter().filter(|d| d.bonus.is_some()) {
            assert!(def.unsellable, "{} should be unsellable", def.name);
        }
    }

    #[test]
    fn test_round_one_board() {
        let catalog = Catalog::standard();
        let names: Vec<_> = catalog.workplaces_opening(1).map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Quarry", "Mine", "School", "Carpenter"]);
    }
}
