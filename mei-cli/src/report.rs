//! Plain-text report rendering with Brazilian currency formatting.

use std::fmt;

use mei_core::calculations::common::round_half_up;
use mei_core::calculations::Severity;
use mei_core::{Address, Organizer};
use rust_decimal::Decimal;

/// Formats an amount as `R$ 1.234,56`, rounding half-up to cents.
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{frac_part}")
}

/// Formats a percentage value (already scaled to 0..100) as `12,34%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_half_up(value)).replace('.', ",")
}

/// Formats a bracket rate (0..1) as `7,5%`.
fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize()).replace('.', ",")
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "[OK]   ",
        Severity::Warning => "[AVISO]",
        Severity::Error => "[ERRO] ",
    }
}

fn write_address(f: &mut fmt::Formatter<'_>, address: &Address) -> fmt::Result {
    if address.street.trim().is_empty() && address.city.trim().is_empty() {
        return writeln!(f, "  -");
    }
    write!(f, "  {}, {}", or_dash(&address.street), or_dash(&address.number))?;
    if !address.complement.trim().is_empty() {
        write!(f, " - {}", address.complement)?;
    }
    writeln!(f)?;
    writeln!(
        f,
        "  {} {}/{} CEP {}",
        address.district,
        or_dash(&address.city),
        or_dash(&address.state),
        or_dash(&address.postal_code)
    )
}

/// Renders an [`Organizer`] as text.
///
/// [`Report::summary`] shows only the financial figures and the bracket
/// table; [`Report::full`] adds the profile, breakdowns and checks.
pub struct Report<'a> {
    organizer: &'a Organizer,
    full: bool,
}

impl<'a> Report<'a> {
    pub fn full(organizer: &'a Organizer) -> Self {
        Self {
            organizer,
            full: true,
        }
    }

    pub fn summary(organizer: &'a Organizer) -> Self {
        Self {
            organizer,
            full: false,
        }
    }

    fn write_profile(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.organizer.state();
        let id = &state.identification;

        writeln!(f, "Identificação")?;
        writeln!(f, "  Nome:            {}", or_dash(&id.name))?;
        writeln!(f, "  CPF:             {}", or_dash(&id.cpf))?;
        writeln!(f, "  CNPJ:            {}", or_dash(&id.cnpj))?;
        writeln!(f, "  Ano fiscal:      {}", or_dash(&id.fiscal_year))?;
        writeln!(f, "  Atividade:       {}", or_dash(&id.activity_label))?;
        writeln!(f, "  Abertura:        {}", or_dash(&id.opening_date))?;
        writeln!(f)?;

        writeln!(f, "Endereço residencial")?;
        write_address(f, &state.address.residential)?;
        writeln!(f, "Endereço fiscal")?;
        match (state.address.same_address, state.address.fiscal_address()) {
            (true, _) => writeln!(f, "  (igual ao residencial)")?,
            (false, Some(fiscal)) => write_address(f, fiscal)?,
            (false, None) => writeln!(f, "  -")?,
        }
        writeln!(f)?;

        writeln!(f, "Atividade")?;
        writeln!(
            f,
            "  CNAE {}: {}",
            or_dash(&state.activity.cnae),
            or_dash(&state.activity.description)
        )?;
        writeln!(f)
    }

    fn write_financials(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self.organizer.output();
        let sim = &output.simulation;

        writeln!(f, "Resumo financeiro")?;
        for (label, value) in [
            ("Receita bruta MEI", output.revenue_total),
            ("Despesas", output.expense_total),
            ("Lucro MEI", output.mei_profit),
            ("Outros rendimentos", output.other_income.total),
            ("Renda bruta", sim.gross_income),
            ("Deduções", sim.total_deductions),
            ("Base de cálculo", sim.taxable_base),
            ("Imposto devido", sim.tax_due),
        ] {
            writeln!(f, "  {label:<20}{:>18}", format_brl(value))?;
        }
        writeln!(
            f,
            "  {:<20}{:>18}",
            "Alíquota efetiva",
            format_percent(sim.effective_rate)
        )?;
        writeln!(f, "  {:<20}{}", "Situação", sim.filing_status.to_long_str())?;
        writeln!(
            f,
            "  {:<20}{}",
            "Declaração",
            if sim.filing_required {
                "obrigatória"
            } else {
                "não obrigatória"
            }
        )?;
        if self.organizer.state().what_if.active {
            writeln!(f, "  * valores incluem a simulação \"e se\" ativa")?;
        }
        writeln!(f)?;

        writeln!(f, "Faixas")?;
        writeln!(
            f,
            "  {:>16} {:>16} {:>8} {:>18} {:>16}",
            "De", "Até", "Alíquota", "Base na faixa", "Imposto"
        )?;
        for slice in &sim.brackets {
            let upper = slice
                .upper_bound
                .map(format_brl)
                .unwrap_or_else(|| "acima".to_string());
            writeln!(
                f,
                "  {:>16} {:>16} {:>8} {:>18} {:>16}",
                format_brl(slice.lower_bound),
                upper,
                format_rate(slice.rate),
                format_brl(slice.income_in_bracket),
                format_brl(slice.tax_in_bracket)
            )?;
        }
        writeln!(f)
    }

    fn write_breakdowns(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = &self.organizer.state().ledger;

        writeln!(f, "Receitas por categoria")?;
        let revenues = ledger.revenues_by_category();
        if revenues.is_empty() {
            writeln!(f, "  -")?;
        }
        for (category, total) in revenues {
            writeln!(f, "  {:<20}{:>18}", category.label(), format_brl(total))?;
        }
        writeln!(f)?;

        writeln!(f, "Despesas por categoria")?;
        let expenses = ledger.expenses_by_category();
        if expenses.is_empty() {
            writeln!(f, "  -")?;
        }
        for (category, total) in expenses {
            writeln!(f, "  {:<20}{:>18}", category.label(), format_brl(total))?;
        }
        writeln!(
            f,
            "  {:<20}{:>18}",
            "Depreciação anual",
            format_brl(ledger.total_annual_depreciation())
        )?;
        writeln!(f)?;

        let assets = self.organizer.asset_summary();
        writeln!(f, "Bens")?;
        writeln!(f, "  {:<20}{:>18}", "Quantidade", assets.count)?;
        writeln!(f, "  {:<20}{:>18}", "Valor total", format_brl(assets.total_value))?;
        writeln!(
            f,
            "  {:<20}{:>18}",
            "Uso profissional",
            assets.professional_count.normalize()
        )?;
        writeln!(
            f,
            "  {:<20}{:>18}",
            "Uso pessoal",
            assets.personal_count.normalize()
        )?;
        writeln!(f)
    }

    fn write_checks(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.organizer.validations();

        writeln!(f, "Verificações (preenchimento {}%)", report.progress)?;
        for check in &report.checks {
            writeln!(
                f,
                "  {} {}: {}",
                severity_tag(check.severity),
                check.kind.title(),
                check.message
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Organizador MEI: simulação IRPF {} ===",
            self.organizer.rules().tax_year
        )?;
        writeln!(f)?;

        if self.full {
            self.write_profile(f)?;
        }
        self.write_financials(f)?;
        if self.full {
            self.write_breakdowns(f)?;
            self.write_checks(f)?;
        }
        Ok(())
    }
}
