/*!

This is the long-form manual for `organogram` and `organogram-etl`.

## Workbook format

An organogram is published as a spreadsheet (`.xls` or `.xlsx`) with two data
sheets and up to three reference sheets. Sheets are found by their exact name,
other sheets are ignored.

| Sheet                              | Required | Content                                 |
|------------------------------------|----------|-----------------------------------------|
| `(final data) senior-staff`        | yes      | one row per senior post                 |
| `(final data) junior-staff`        | yes      | one row per group of junior posts       |
| `(reference) senior-staff-grades`  | no       | the grades accepted in the senior sheet |
| `(reference) professions`          | no       | the professional groups                 |
| `(reference) units`                | no       | the units of the organisation           |

The first row of each data sheet holds the column titles, which must match the
pro-forma exactly. Columns beyond the last expected one are ignored. Rows where
the first two columns are empty are ignored as well.

### `(final data) senior-staff`

| Column | Title                             | Notes                                      |
|--------|-----------------------------------|--------------------------------------------|
| A      | Post Unique Reference             | `0` when the individual is not in post     |
| B      | Name                              | `N/D` if withheld, `Vacant`, `Eliminated`  |
| C      | Grade (or equivalent)             | `Grade` in older pro-formas                |
| D      | Job Title                         |                                            |
| E      | Job/Team Function                 |                                            |
| F      | Parent Department                 |                                            |
| G      | Organisation                      |                                            |
| H      | Unit                              |                                            |
| I      | Contact Phone                     |                                            |
| J      | Contact E-mail                    |                                            |
| K      | Reports to Senior Post            | `XX` for the top post(s)                   |
| L      | Salary Cost of Reports (£)        | whole number                               |
| M      | FTE                               | written with two decimals                  |
| N      | Actual Pay Floor (£)              | whole number                               |
| O      | Actual Pay Ceiling (£)            | whole number                               |
| P      | Total Pay (£)                     | any title, the content is dropped          |
| Q      | Professional/Occupational Group   |                                            |
| R      | Notes                             |                                            |
| S      | Valid?                            | computed by the spreadsheet: `1` or `0`    |

### `(final data) junior-staff`

| Column | Title                             |
|--------|-----------------------------------|
| A      | Parent Department                 |
| B      | Organisation                      |
| C      | Unit                              |
| D      | Reporting Senior Post             |
| E      | Grade                             |
| F      | Payscale Minimum (£)              |
| G      | Payscale Maximum (£)              |
| H      | Generic Job Title                 |
| I      | Number of Posts in FTE            |
| J      | Professional/Occupational Group   |
| K      | Valid?                            |

## Values

Every value column may hold `N/A` (not applicable, for example the pay of an
unpaid post) or `N/D` (not disclosed). In the money columns, these are
recognised loosely (`n/a`, `N.A.` and `NA` all work) and an empty cell counts
as `N/A`. Any other text in a money column is reported as an error and
written as `0`.

## Checks

The senior rows are checked column by column, following the formulas of the
pro-forma. When the pro-forma computed its own `Valid?` column, the two
verdicts are reconciled: the spreadsheet is trusted when it found no problem,
and its own errors are reported when the column checks missed them.

The reporting structure is then verified:
- at least one post reports to `XX`, otherwise nothing can be displayed
- every post reports to an existing post
- following the reporting lines from any post reaches a top post in at most
  100 steps, without loops
- rows sharing a reference (job shares) only differ in the person-specific
  columns: name, contact details, pay, FTE and notes
- every junior post reports to an existing (not eliminated) senior post

## Verify levels

How strict to be depends on the date of the organogram:

| Date                          | Level                          | Effect                                   |
|-------------------------------|--------------------------------|------------------------------------------|
| up to 2011                    | `load`                         | no reporting structure check             |
| 2012 to March 2016            | `load and display`             | errors are reported, data is displayed   |
| April 2016 onwards            | `load, display and be valid`   | any error rejects the organogram         |

The command line uses the strictest level unless a date is given with
`--date` or taken from the file name with `--date-from-filename`.

## Outputs

`organogram-etl etl` writes `<name>-senior.csv` and `<name>-junior.csv`, with
every field quoted and the canonical column titles, and an `index.json` file
naming the organogram.

`organogram-etl migrate` processes a whole collection of legacy uploads and
keeps track of the snapshots in `organograms.json`.

 */
