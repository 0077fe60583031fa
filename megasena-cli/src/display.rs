use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use megasena_analysis::pairs::PairFrequency;
use megasena_analysis::{Analysis, CheckResult, Coverage, Tier, YearWeights};
use megasena_db::models::{Draw, Game};

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Nenhum concurso para exibir.");
        return;
    }

    let mut table = new_table(vec!["Concurso", "Data", "Dezenas"]);
    for draw in draws {
        table.add_row(vec![
            draw.contest.to_string(),
            draw.date.format("%d/%m/%Y").to_string(),
            format_numbers(&draw.numbers),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importação concluída:");
    println!("  Linhas lidas       : {}", result.total_records);
    println!("  Inseridos          : {}", result.inserted);
    println!("  Repetidos ignorados: {}", result.skipped);
    if result.errors > 0 {
        println!("  Erros              : {}", result.errors);
    }
}

pub fn display_overview(analysis: &Analysis, source: &str) {
    let latest = analysis.latest_draw();
    println!("\n📊 Mega-Sena ({source})\n");
    println!("  Último concurso   : {} ({})", latest.contest, latest.date.format("%d/%m/%Y"));
    println!("  Dezenas sorteadas : {}", format_numbers(&latest.numbers));
    println!("  Total de concursos: {}", analysis.history().len());
    if let Coverage::Degraded { window } = analysis.coverage() {
        println!(
            "  ⚠ Nenhum concurso em {}: estatísticas sobre os {} últimos concursos",
            analysis.weights().current_year(),
            window
        );
    }
}

pub fn display_weights(weights: &YearWeights) {
    println!("\n── Pesos por ano ──");
    let mut table = new_table(vec!["Ano", "Peso"]);
    for (offset, weight) in weights.weights().iter().enumerate() {
        table.add_row(vec![
            (weights.current_year() - offset as i32).to_string(),
            format!("{:.4}", weight),
        ]);
    }
    println!("{table}");
}

pub fn display_stats(analysis: &Analysis, limit: usize) {
    let stats = analysis.stats();
    println!("\n── Dezenas mais quentes (frequência ponderada) ──");
    let mut table = new_table(vec!["Dezena", "Frequência", "Ponderada", "Último concurso", "Atraso"]);

    for n in stats.hot_numbers(limit) {
        let Some(stat) = stats.get(n) else { continue };
        let last = stat
            .last_drawn_contest
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            format!("{:02}", stat.number),
            stat.count.to_string(),
            format!("{:.3}", stat.weighted_count),
            last,
            stat.gap_since_last_drawn.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_delayed(delayed: &[(u8, u32)]) {
    println!("\n── Dezenas mais atrasadas ──");
    let mut table = new_table(vec!["Dezena", "Concursos sem sair"]);
    for (number, gap) in delayed {
        table.add_row(vec![format!("{:02}", number), gap.to_string()]);
    }
    println!("{table}");
}

pub fn display_pairs(title: &str, pairs: &[PairFrequency]) {
    println!("\n── {title} ──");
    let mut table = new_table(vec!["Par", "Frequência", "Ponderada"]);
    for p in pairs {
        table.add_row(vec![
            format!("{:02} e {:02}", p.pair.0, p.pair.1),
            p.count.to_string(),
            format!("{:.3}", p.weighted),
        ]);
    }
    println!("{table}");
}

pub fn display_games(games: &[Game]) {
    if games.is_empty() {
        println!("Nenhum jogo salvo.");
        return;
    }

    let mut table = new_table(vec!["#", "Id", "Dezenas", "Qtd", "Tipo", "Criado em"]);
    for (i, game) in games.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            game.id.clone(),
            format_numbers(&game.numbers),
            game.size().to_string(),
            game.origin.to_string(),
            game.created_at.format("%d/%m/%Y %H:%M").to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_check_results(draw: &Draw, games: &[Game], results: &[CheckResult]) {
    println!(
        "\n🎯 Conferência com o concurso {} ({}): {}\n",
        draw.contest,
        draw.date.format("%d/%m/%Y"),
        format_numbers(&draw.numbers)
    );

    let mut table = new_table(vec!["Jogo", "Dezenas", "Acertos", "Faixa"]);
    for result in results {
        let numbers = games
            .get(result.game_index)
            .map(|g| format_numbers(&g.numbers))
            .unwrap_or_default();
        let color = match result.tier {
            Tier::Sena => Color::Green,
            Tier::Quina => Color::Cyan,
            Tier::Quadra => Color::Yellow,
            Tier::NoPrize => Color::White,
        };
        table.add_row(vec![
            Cell::new(result.game_index + 1),
            Cell::new(numbers),
            Cell::new(format!("{} ({})", result.hits, format_numbers(&result.matched))),
            Cell::new(result.tier.to_string()).fg(color),
        ]);
    }
    println!("{table}");

    let prizes = results.iter().filter(|r| r.tier.is_prize()).count();
    println!("{} jogo(s) premiado(s) de {}", prizes, results.len());
}
